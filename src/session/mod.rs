pub mod controller;
pub mod store;

pub use controller::{
    ActiveSession, ControllerError, Evaluation, NextQuestion, Phase, SessionController,
    AUTO_ADVANCE_DELAY, QUESTIONS_PER_SESSION,
};
pub use store::{SessionStore, StoredSession};
