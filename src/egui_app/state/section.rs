use std::fmt;
use std::str::FromStr;

/// Top-level dashboard pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    Shap,
    Lime,
    Lrp,
    IntegratedGradients,
    ModelInfo,
}

impl Section {
    /// Every section in navigation order.
    pub const ALL: [Section; 6] = [
        Section::Home,
        Section::Shap,
        Section::Lime,
        Section::Lrp,
        Section::IntegratedGradients,
        Section::ModelInfo,
    ];

    /// Identifier used by the navigation contract.
    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Shap => "shap",
            Section::Lime => "lime",
            Section::Lrp => "lrp",
            Section::IntegratedGradients => "integrated-gradients",
            Section::ModelInfo => "model-info",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Shap => "SHAP",
            Section::Lime => "LIME",
            Section::Lrp => "LRP",
            Section::IntegratedGradients => "Integrated Gradients",
            Section::ModelInfo => "Model Info",
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == value)
            .ok_or_else(|| value.to_string())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
