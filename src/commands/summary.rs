use super::open_app;
use crate::{
    libs::{formatter, messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let app = open_app()?;
    let summary = app.summary();

    msg_print!(Message::SummaryHeader, true);
    View::summary(&summary)?;

    if !summary.value_by_category.is_empty() {
        msg_print!(Message::InventoryByCategoryHeader, true);
        View::breakdown(&summary.value_by_category, |value| format!("{:.2}", value))?;
    }

    if !summary.tasks_by_status.is_empty() {
        msg_print!(Message::TasksByStatusHeader, true);
        View::breakdown(&summary.tasks_by_status, ToString::to_string)?;
        msg_print!(Message::TasksByPriorityHeader, true);
        View::breakdown(&summary.tasks_by_priority, ToString::to_string)?;
    }

    if !summary.attendance_rates.is_empty() {
        msg_print!(Message::AttendanceRatesHeader, true);
        View::breakdown(&summary.attendance_rates, |rate| formatter::format_percent(*rate))?;
    }

    Ok(())
}
