//! Server state shared by every connection handler.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        ConnectUserUseCase, DisconnectUserUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectUserUseCase（認証と登録のユースケース）
    pub connect_user_usecase: Arc<ConnectUserUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// SendMessageUseCase（ルームリレーのユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectUserUseCase（切断処理のユースケース）
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// MessagePusher（発信元へのエラー通知用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// 接続ごとの送信キューの容量
    pub outbound_capacity: usize,
}
