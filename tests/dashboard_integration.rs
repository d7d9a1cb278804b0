mod support;

use std::time::{Duration, Instant};

use serde_json::json;
use support::{
    artifact_server::ArtifactServer,
    media::{png_bytes, wav_bytes},
    xaiboard_env::XaiboardEnvGuard,
};
use xaiboard::{
    app_dirs,
    artifacts::FetchState,
    config::{self, AppConfig, ArtifactServerConfig},
    egui_app::{
        controller::{ActiveView, EguiController, ExplanationView},
        state::{AlertTone, Section},
    },
    waveform::WaveformStatus,
};

const CHART_SIZE: egui::Vec2 = egui::vec2(480.0, 240.0);

fn controller_for(server: &ArtifactServer) -> EguiController {
    let config = AppConfig {
        artifact_server: ArtifactServerConfig {
            scheme: "http".into(),
            host: "127.0.0.1".into(),
            port: server.port(),
        },
        ..AppConfig::default()
    };
    EguiController::new(&config, None).expect("build controller")
}

/// Poll background jobs until `done` holds or five seconds pass.
fn wait_until(controller: &mut EguiController, mut done: impl FnMut(&EguiController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        controller.poll_jobs();
        if done(controller) {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("timed out waiting for background jobs");
}

fn explanation(controller: &mut EguiController) -> &mut ExplanationView {
    match controller.view_mut() {
        ActiveView::Explanation(view) => view,
        _ => panic!("expected an explanation page"),
    }
}

#[test]
fn lrp_page_then_model_info() {
    let server = ArtifactServer::builder()
        .json("/lrp/lrp_attributions.json", json!({"attributions": [0.1, -0.2, 0.05]}))
        .bytes("/input.wav", "audio/wav", wav_bytes(&[0.0, 0.5, -0.5, 0.25]))
        .bytes("/lrp/lrp_attribution_heat_map.png", "image/png", png_bytes(4, 3, [200, 40, 40]))
        .bytes("/lrp/lrp_spectogram.png", "image/png", png_bytes(4, 3, [40, 40, 200]))
        .json("/labels.json", json!({"jazz": 1, "blues": 0}))
        .start();
    let mut controller = controller_for(&server);

    assert_eq!(controller.select_section("lrp"), Ok(true));
    wait_until(&mut controller, |controller| !controller.is_busy());

    let view = explanation(&mut controller);
    let chart = view
        .sync_chart(CHART_SIZE)
        .expect("attributions ready")
        .expect("chart rendered");
    assert_eq!(chart.points().len(), 3);
    assert_eq!(chart.labels(), vec!["0", "1", "2"]);
    let original = view.audio_slots()[0].handle().expect("waveform handle");
    assert_eq!(original.status(), &WaveformStatus::Ready);
    assert_eq!(original.duration_seconds(), Some(0.5));
    let images = view.images().expect("lrp has an image pair");
    assert!(images.current().state().ready().is_some());
    assert_eq!(view.live_charts(), 1);
    assert_eq!(view.live_waveforms(), 1);

    assert_eq!(controller.select_section("model-info"), Ok(true));
    assert_eq!(controller.current_section(), Section::ModelInfo);
    wait_until(&mut controller, |controller| !controller.is_busy());
    let ActiveView::ModelInfo(info) = controller.view() else {
        panic!("expected the model info page");
    };
    let labels = info.labels().ready().expect("labels ready");
    let rows: Vec<_> = labels
        .entries()
        .iter()
        .map(|entry| (entry.class_id, entry.class_name.as_str()))
        .collect();
    assert_eq!(rows, vec![(0, "blues"), (1, "jazz")]);
    assert_eq!(server.hits("/lrp/lrp_attributions.json"), 1);
    assert_eq!(server.hits("/labels.json"), 1);
}

#[test]
fn shap_404_shows_error_and_no_chart() {
    let server = ArtifactServer::builder()
        .status("/shap_attributions.json", 404)
        .bytes("/input.wav", "audio/wav", wav_bytes(&[0.0, 0.1]))
        .start();
    let mut controller = controller_for(&server);
    controller.select_section("shap").expect("select shap");
    wait_until(&mut controller, |controller| !controller.is_busy());

    let view = explanation(&mut controller);
    match view.attributions() {
        Some(FetchState::Error(err)) => assert!(err.inline_message().contains("404")),
        _ => panic!("expected an error state"),
    }
    assert!(view.sync_chart(CHART_SIZE).is_none());
    assert_eq!(view.live_charts(), 0);
    assert_eq!(
        view.audio_slots()[0].handle().map(|handle| handle.status().clone()),
        Some(WaveformStatus::Ready)
    );
    let alert = &controller.alerts().entries()[0];
    assert_eq!(alert.tone, AlertTone::Error);
    assert!(alert.message.contains("404"));
}

#[test]
fn missing_explanation_audio_is_isolated() {
    let server = ArtifactServer::builder()
        .bytes("/input.wav", "audio/wav", wav_bytes(&[0.0, 0.2, -0.2]))
        .start();
    let mut controller = controller_for(&server);
    controller.select_section("lime").expect("select lime");
    wait_until(&mut controller, |controller| !controller.is_busy());

    let view = explanation(&mut controller);
    let slots = view.audio_slots();
    assert_eq!(slots[0].handle().map(|h| h.status().clone()), Some(WaveformStatus::Ready));
    match slots[1].handle().map(|h| h.status().clone()) {
        Some(WaveformStatus::Failed(message)) => {
            assert!(message.starts_with("Error: "));
            assert!(message.contains("404"));
        }
        other => panic!("unexpected explanation status {other:?}"),
    }
}

#[test]
fn reselecting_does_not_refetch_and_revisiting_does() {
    let server = ArtifactServer::builder()
        .json("/shap_attributions.json", json!({"attributions": [1.0]}))
        .bytes("/input.wav", "audio/wav", wav_bytes(&[0.0]))
        .start();
    let mut controller = controller_for(&server);
    controller.select_section("shap").expect("select shap");
    wait_until(&mut controller, |controller| !controller.is_busy());
    assert_eq!(controller.select_section("shap"), Ok(false));

    controller.select_section("home").expect("select home");
    controller.select_section("shap").expect("select shap again");
    assert!(matches!(
        explanation(&mut controller).attributions(),
        Some(FetchState::Loading)
    ));
    wait_until(&mut controller, |controller| !controller.is_busy());
    assert_eq!(server.hits("/shap_attributions.json"), 2);
}

#[test]
fn slow_page_does_not_hold_up_the_next_one() {
    let stall = Duration::from_secs(3);
    let server = ArtifactServer::builder()
        .slow_json(
            "/lrp/lrp_attributions.json",
            json!({"attributions": [0.5]}),
            stall,
        )
        .json("/labels.json", json!({"rock": 0}))
        .start();
    let mut controller = controller_for(&server);
    controller.select_section("lrp").expect("select lrp");
    std::thread::sleep(Duration::from_millis(100));

    let started = Instant::now();
    controller.select_section("model-info").expect("select model info");
    wait_until(&mut controller, |controller| match controller.view() {
        ActiveView::ModelInfo(info) => info.labels().ready().is_some(),
        _ => false,
    });
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(server.hits("/labels.json"), 1);
}

#[test]
fn unknown_section_raises_warning() {
    let server = ArtifactServer::builder().start();
    let mut controller = controller_for(&server);
    assert!(controller.select_section("saliency").is_err());
    assert_eq!(controller.current_section(), Section::Home);
    assert_eq!(controller.alerts().entries()[0].tone, AlertTone::Warning);
}

#[test]
fn port_comes_from_environment() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let app_dir = temp.path().join(app_dirs::APP_DIR_NAME);
    std::fs::create_dir_all(&app_dir).expect("create app dir");
    std::fs::write(
        app_dir.join(config::CONFIG_FILE_NAME),
        "[artifact_server]\nhost = \"127.0.0.1\"\nport = 9100\n",
    )
    .expect("write config");
    let _env = XaiboardEnvGuard::new()
        .set_config_home(temp.path())
        .set(config::PORT_ENV, Some("9555"));
    let loaded = config::load_or_default().expect("load config");
    assert_eq!(loaded.artifact_server.host, "127.0.0.1");
    assert_eq!(loaded.artifact_server.port, 9555);
}
