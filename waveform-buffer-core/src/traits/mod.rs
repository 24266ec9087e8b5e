pub mod clock;
pub mod waveform_delegate;
pub mod waveform_service;
