use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum GamePhase {
    Waiting,      // ゲーム開始前
    Night,        // 夜フェーズ
    Discussion,   // 議論フェーズ
    Voting,       // 投票フェーズ
    RunoffVoting, // 決選投票フェーズ
    Result,       // 結果発表フェーズ
    Finished,     // ゲーム終了
}
