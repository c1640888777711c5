//! 首单奖励判定
//!
//! 纯函数实现首单奖励的发放与冲销判定，由下单服务和取消服务在
//! 各自事务内调用。资格按批次评估：首个下单批次中任一行数量达到
//! 阈值即一次性发放，取消单行不影响同批次仍达标的其他行。

/// 首单奖励积分数
pub const BONUS_POINTS: i32 = 2100;

/// 触发奖励的单行最低订购数量
pub const BONUS_QUANTITY_THRESHOLD: i32 = 50;

/// 发放流水的固定描述
pub const GRANT_DESCRIPTION: &str = "First order bonus";

/// 冲销流水的固定描述
pub const RETRACTION_DESCRIPTION: &str = "First order bonus reversal on cancellation";

/// 下单时的奖励判定
///
/// 用户此前没有任何订单，且本批次任一行数量达到阈值时发放。
/// `has_prior_orders` 必须在本批第一行写入之前求值，同批所有行
/// 共享同一资格窗口。
pub fn grant_on_placement(has_prior_orders: bool, quantities: &[i32]) -> bool {
    !has_prior_orders
        && quantities
            .iter()
            .any(|&q| q >= BONUS_QUANTITY_THRESHOLD)
}

/// 取消时的冲销判定
///
/// 被取消的行属于首单批次、数量达到阈值，且同批次剩余未取消行
/// 均未达到阈值时需要冲销。是否真正追加负数流水还取决于是否存在
/// 未兑换的发放记录，该检查由调用方在同一事务内完成。
pub fn retract_on_cancel(
    is_first_batch: bool,
    cancelled_quantity: i32,
    sibling_quantities: &[i32],
) -> bool {
    is_first_batch
        && cancelled_quantity >= BONUS_QUANTITY_THRESHOLD
        && !sibling_quantities
            .iter()
            .any(|&q| q >= BONUS_QUANTITY_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== 发放判定 ====================

    #[test]
    fn test_grant_on_first_batch_with_qualifying_line() {
        assert!(grant_on_placement(false, &[60, 5]));
    }

    #[test]
    fn test_grant_at_exact_threshold() {
        assert!(grant_on_placement(false, &[50]));
    }

    #[test]
    fn test_no_grant_below_threshold() {
        assert!(!grant_on_placement(false, &[49, 10, 1]));
    }

    #[test]
    fn test_no_grant_with_prior_orders() {
        // 第二个批次即使数量达标也不再发放
        assert!(!grant_on_placement(true, &[100]));
    }

    #[test]
    fn test_no_grant_for_empty_batch() {
        assert!(!grant_on_placement(false, &[]));
    }

    // ==================== 冲销判定 ====================

    #[test]
    fn test_retract_when_sole_qualifying_line_cancelled() {
        assert!(retract_on_cancel(true, 60, &[5]));
    }

    #[test]
    fn test_retract_with_no_siblings() {
        assert!(retract_on_cancel(true, 50, &[]));
    }

    #[test]
    fn test_no_retract_when_sibling_still_qualifies() {
        assert!(!retract_on_cancel(true, 60, &[70, 5]));
    }

    #[test]
    fn test_no_retract_for_non_first_batch() {
        assert!(!retract_on_cancel(false, 60, &[]));
    }

    #[test]
    fn test_no_retract_below_threshold() {
        // 取消未达标的行不触及奖励
        assert!(!retract_on_cancel(true, 5, &[60]));
    }

    #[test]
    fn test_retract_sibling_at_exact_threshold_blocks() {
        assert!(!retract_on_cancel(true, 60, &[50]));
    }
}
