#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod host;

pub use fakes::{RecordingInstaller, ScriptedConfirmer};
pub use host::HostFixture;
