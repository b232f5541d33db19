//! UseCase layer: one usecase per inbound gateway event.

mod connect;
mod disconnect;
mod error;
mod register;
mod seen;
mod send_message;
mod typing;

pub use connect::{ConnectUseCase, InitialSnapshot};
pub use disconnect::{DisconnectOutcome, DisconnectUseCase};
pub use error::{RegisterError, SendMessageError};
pub use register::RegisterUseCase;
pub use seen::SeenUseCase;
pub use send_message::SendMessageUseCase;
pub use typing::TypingUseCase;
