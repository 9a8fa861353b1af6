use serde::{Deserialize, Serialize};

// 最多得票が同数だったときの処理方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionRule {
    Runoff,       // 決選投票を行う
    Random,       // ランダムに一人を処刑
    NoExecution,  // 処刑なし
    AllExecution, // 同数の候補全員を処刑
}

impl ExecutionRule {
    // 設定文字列のパース。未知の値は Runoff として扱う。
    pub fn parse(value: &str) -> Self {
        match value {
            "runoff" => ExecutionRule::Runoff,
            "random" => ExecutionRule::Random,
            "no_execution" => ExecutionRule::NoExecution,
            "all_execution" => ExecutionRule::AllExecution,
            _ => ExecutionRule::Runoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VotingPolicy {
    pub execution_rule: ExecutionRule,
    // 決選投票でさらに同数だったときの規則
    pub runoff_tie_rule: ExecutionRule,
    pub allow_self_vote: bool,
    pub reveal_role_on_death: bool,
}

impl Default for VotingPolicy {
    fn default() -> Self {
        Self {
            execution_rule: ExecutionRule::Runoff,
            runoff_tie_rule: ExecutionRule::Runoff,
            allow_self_vote: false,
            reveal_role_on_death: true,
        }
    }
}
