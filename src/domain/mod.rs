pub mod error;
pub mod library;
pub mod mp3;
pub mod playlist;
pub mod track;
pub mod wav;
pub mod waveform;
