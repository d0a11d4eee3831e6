//! Usage log: an append-only record of device quantity changes.

use serde::{Deserialize, Serialize};

use crate::device::{Adjustment, QuantityAction, Resource};
use crate::id::{DeviceId, UsageLogId};
use crate::time::{Timestamp, now};

/// One accepted quantity adjustment on a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLog {
    pub id: UsageLogId,
    pub device_id: DeviceId,
    pub resource: Resource,
    pub action: QuantityAction,
    /// Amount requested, before clamping.
    pub amount: u32,
    pub previous_quantity: u32,
    pub new_quantity: u32,
    pub recorded_at: Timestamp,
}

impl UsageLog {
    /// Record an adjustment that was just applied to `device_id`.
    #[must_use]
    pub fn record(
        device_id: DeviceId,
        resource: Resource,
        action: QuantityAction,
        amount: u32,
        adjustment: Adjustment,
    ) -> Self {
        Self {
            id: UsageLogId::new(),
            device_id,
            resource,
            action,
            amount,
            previous_quantity: adjustment.previous,
            new_quantity: adjustment.current,
            recorded_at: now(),
        }
    }

    /// Signed change actually applied after clamping.
    #[must_use]
    pub fn applied_delta(&self) -> i64 {
        i64::from(self.new_quantity) - i64::from(self.previous_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_clamped_delta() {
        let log = UsageLog::record(
            DeviceId::new(),
            Resource::Water,
            QuantityAction::Subtract,
            500,
            Adjustment {
                previous: 120,
                current: 0,
            },
        );
        assert_eq!(log.amount, 500);
        assert_eq!(log.applied_delta(), -120);
    }
}
