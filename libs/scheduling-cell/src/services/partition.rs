use crate::models::{AvailabilitySlot, AvailabilityTable, DaySchedule, TimeSlot};

/// First hour that belongs to the afternoon.
pub const MORNING_CUTOFF_HOUR: i32 = 12;

/// Zero-padded 24-hour label with fixed minutes, e.g. `09:00`.
pub fn format_hour_label(hour: i32) -> String {
    format!("{:02}:00", hour)
}

/// Splits a day's availability into morning and afternoon slot lists.
///
/// This is a stable filter, not a sort: each half keeps the table's order.
/// Hours outside 0..=23 are passed through untouched.
pub fn partition(table: &AvailabilityTable) -> DaySchedule {
    partition_slots(table.slots())
}

pub fn partition_slots(slots: &[AvailabilitySlot]) -> DaySchedule {
    let (morning, afternoon): (Vec<TimeSlot>, Vec<TimeSlot>) = slots
        .iter()
        .map(|slot| TimeSlot {
            hour: slot.hour,
            available: slot.available,
            display_label: format_hour_label(slot.hour),
            selected: false,
        })
        .partition(|slot| slot.hour < MORNING_CUTOFF_HOUR);

    DaySchedule { morning, afternoon }
}
