mod permission;
mod wav_recorder;

pub use {permission::HostMicrophonePermission, wav_recorder::WavRecorder};
