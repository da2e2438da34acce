//! Flow index and behavior-class adjustment.

use crate::catalog::{BehaviorClass, TargetRange};

/// Neutral index used when a site's target range is unusable
pub const DEGENERATE_INDEX: f64 = 0.6;

/// Where a reading sits relative to the target range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowBand {
    Low,
    InRange,
    SlightlyHigh,
    High,
    BlownOut,
    /// Target range is not a usable band
    Degenerate,
}

/// Map a reading at or above the site minimum onto [0, 1].
///
/// ```text
/// minimum ... low ......... high ... 1.2 high ... 1.4 high
///   0.2 ----> 0.6 | 1.0 1.0 | 0.8 --> 0.5 -----> 0.0
/// ```
pub fn flow_index(value: f64, minimum: f64, target: &TargetRange) -> (f64, FlowBand) {
    if target.is_degenerate() {
        return (DEGENERATE_INDEX, FlowBand::Degenerate);
    }

    let (low, high) = (target.low, target.high);
    if value < low {
        let frac = if low > minimum {
            ((value - minimum) / (low - minimum)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        return (0.2 + 0.4 * frac, FlowBand::Low);
    }
    if value <= high {
        return (1.0, FlowBand::InRange);
    }

    let step = 0.2 * high;
    if value <= 1.2 * high {
        let t = (value - high) / step;
        return (0.8 - 0.3 * t, FlowBand::SlightlyHigh);
    }
    if value <= 1.4 * high {
        let t = (value - 1.2 * high) / step;
        return ((0.5 - 0.5 * t).max(0.0), FlowBand::High);
    }

    (0.0, FlowBand::BlownOut)
}

/// Reward window, penalty edges and magnitude for one behavior class.
struct BehaviorWindow {
    low: f64,
    high: f64,
    /// Penalised below this index
    floor: f64,
    /// Penalised above this index
    ceiling: f64,
    magnitude: f64,
}

fn window(class: BehaviorClass) -> Option<BehaviorWindow> {
    let (low, high, floor, ceiling, magnitude) = match class {
        BehaviorClass::Flashy => (0.5, 0.8, 0.2, 0.9, 0.5),
        BehaviorClass::Large => (0.3, 0.8, 0.2, 0.8, 0.5),
        BehaviorClass::Glacial => (0.3, 0.85, 0.3, 0.85, 0.5),
        BehaviorClass::Mixed => (0.4, 0.8, 0.2, 0.9, 0.25),
        BehaviorClass::Generic => return None,
    };
    Some(BehaviorWindow {
        low,
        high,
        floor,
        ceiling,
        magnitude,
    })
}

/// Bonus for a flow index inside the class's sweet spot, penalty outside
/// its floor or ceiling.
pub fn behavior_bonus(class: BehaviorClass, index: f64) -> f64 {
    let Some(w) = window(class) else {
        return 0.0;
    };

    if (w.low..=w.high).contains(&index) {
        w.magnitude
    } else if index < w.floor || index > w.ceiling {
        -w.magnitude
    } else {
        0.0
    }
}
