//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース構造体を定義し、ドメイン層のポート（trait）を組み合わせます。

mod connect_user;
mod disconnect_user;
mod error;
mod join_room;
mod leave_room;
mod room_lock;
mod send_message;

pub use connect_user::ConnectUserUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{ConnectError, JoinRoomError, LeaveRoomError, RelayError};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
