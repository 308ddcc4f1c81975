use super::app::Summary;
use super::attendance::Attendance;
use super::formatter;
use super::product::Product;
use super::task::Task;
use super::user::User;
use anyhow::Result;
use prettytable::{row, Table};
use std::collections::BTreeMap;
use std::fmt::Display;

pub struct View {}

impl View {
    pub fn users(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["USERNAME", "FULL NAME", "EMAIL", "DEPARTMENT", "POSITION", "ADMIN", "LAST LOGIN", "STATUS"]);
        for user in users {
            let status = if user.is_locked() {
                format!("locked until {}", formatter::display_timestamp(user.lock_expiry().as_ref()))
            } else if user.login_attempts() > 0 {
                format!("{} failed", user.login_attempts())
            } else {
                "active".to_string()
            };
            table.add_row(row![
                user.username(),
                user.profile.full_name,
                user.profile.email,
                user.profile.department,
                user.profile.position,
                if user.is_admin { "yes" } else { "no" },
                formatter::display_timestamp(user.last_login().as_ref()),
                status
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn products(products: &[Product]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "CATEGORY", "PRICE", "QTY", "MIN", "VALUE", ""]);
        for product in products {
            let flag = if product.is_out_of_stock() {
                "out of stock"
            } else if product.is_low_stock() {
                "low"
            } else {
                ""
            };
            table.add_row(row![
                product.id,
                product.name,
                product.category,
                format!("{:.2}", product.price),
                product.quantity,
                product.min_stock,
                format!("{:.2}", product.stock_value()),
                flag
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let now = formatter::now();
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "ASSIGNED TO", "STATUS", "PRIORITY", "DUE", "CREATED BY"]);
        for task in tasks {
            let due = formatter::display_timestamp(Some(&task.due_date));
            let due = if task.is_overdue(now) { format!("{} (overdue)", due) } else { due };
            table.add_row(row![
                task.id,
                task.title,
                task.assigned_to,
                task.status,
                task.priority,
                due,
                task.created_by
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn attendance(records: &[Attendance]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["EMPLOYEE", "DATE", "STATUS", "NOTES"]);
        for record in records {
            table.add_row(row![
                record.employee,
                formatter::format_date(&record.date),
                if record.present { "present" } else { "absent" },
                record.notes
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn summary(summary: &Summary) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["USERS", summary.users]);
        table.add_row(row!["ADMINISTRATORS", summary.admins]);
        table.add_row(row!["LOCKED ACCOUNTS", summary.locked_users]);
        table.add_row(row!["PRODUCTS", summary.products]);
        table.add_row(row!["LOW STOCK", summary.low_stock]);
        table.add_row(row!["INVENTORY VALUE", format!("{:.2}", summary.inventory_value)]);
        table.add_row(row!["TASKS", summary.tasks]);
        table.add_row(row!["TASKS COMPLETED", formatter::format_percent(summary.task_completion_rate)]);
        table.printstd();

        Ok(())
    }

    /// Two-column table of a keyed projection.
    pub fn breakdown<K: Display, V>(rows: &BTreeMap<K, V>, render: impl Fn(&V) -> String) -> Result<()> {
        let mut table = Table::new();

        for (key, value) in rows {
            table.add_row(row![key, render(value)]);
        }
        table.printstd();

        Ok(())
    }
}
