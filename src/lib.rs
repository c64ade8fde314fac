//! Pulse-train demodulation for ISM-band OOK/FSK transmissions
//!
//! Decodes raw radio-signal timing measurements (pulse/gap duration pairs
//! from an envelope detector) into discrete bit rows for higher-level
//! protocol parsers. Supported codings: PCM (RZ/NRZ), PPM, PWM (simple,
//! precise and ternary variants) and zero-bit-anchored Manchester.
//!
//! A demodulator is invoked once per captured pulse train with a read-only
//! context; it accumulates bits in a private row-oriented buffer and hands
//! the buffer to the configured message handler at each detected
//! end-of-message boundary. The return value is the total count of
//! accepted messages.

pub mod bitbuffer;
pub mod capture;
pub mod config;
pub mod demod;
pub mod protocol;
pub mod pulse;

pub use bitbuffer::BitBuffer;
pub use capture::{CaptureConfig, PulseCapture, PulseSource};
pub use demod::{
    demod_manchester_zerobit, demod_pcm, demod_ppm, demod_pwm, demod_pwm_precise,
    demod_pwm_ternary, DemodArg, DemodContext, MessageHandler, PwmPreciseParams, TernarySync,
};
pub use protocol::{builtin_protocols, load_protocols, Modulation, ProtocolDef, ProtocolError};
pub use pulse::PulseTrain;
