#![allow(dead_code)]

pub mod artifact_server;
pub mod media;
pub mod xaiboard_env;
