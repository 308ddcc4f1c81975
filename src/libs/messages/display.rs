//! Text for every [`Message`] variant.
//!
//! All user-facing wording lives here so the command layer only ever names
//! what happened.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::ConfigModuleAuth => "Login settings".to_string(),
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDefaultsSaved => "Default configuration saved".to_string(),
            Message::PromptDataDir => "Directory for data files".to_string(),
            Message::PromptMaxAttempts => "Failed logins before an account is locked".to_string(),
            Message::PromptLockoutMinutes => "Lock duration in minutes".to_string(),

            // === AUTHENTICATION MESSAGES ===
            Message::PromptUsername => "Username".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),
            Message::PromptNewPassword => "New password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::LoginSuccess(username) => format!("Welcome, {}", username),
            Message::LastLogin(at) => format!("Previous login: {}", at),
            Message::InvalidCredentials => "Invalid username or password".to_string(),
            Message::AccountLocked(until) => format!("Account is locked until {}. Ask an administrator to unlock it", until),
            Message::AdminRequired => "This command requires an administrator account".to_string(),
            Message::AdminLoginHeader => "Administrator login".to_string(),
            Message::UserRegistered(username) => format!("Account '{}' created, you can now log in", username),
            Message::PasswordResetDone(username) => format!("Password for '{}' has been reset", username),
            Message::PasswordResetFailed => "No account matches that username and email".to_string(),

            // === USER MESSAGES ===
            Message::PromptFullName => "Full name".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptDepartment => "Department".to_string(),
            Message::PromptPosition => "Position".to_string(),
            Message::PromptPhoneNumber => "Phone number".to_string(),
            Message::UsersHeader => "Users:".to_string(),
            Message::UserCreated(username) => format!("User '{}' created", username),
            Message::UserAlreadyExists(username) => format!("User '{}' already exists", username),
            Message::UserDeleted(username) => format!("User '{}' deleted", username),
            Message::UserNotFound(username) => format!("User '{}' not found", username),
            Message::UserUnlocked(username) => format!("User '{}' unlocked", username),
            Message::ConfirmDeleteUser(username) => format!("Delete user '{}'?", username),
            Message::CannotDeleteSelf => "You cannot delete the account you are logged in with".to_string(),

            // === PRODUCT MESSAGES ===
            Message::ProductsHeader => "Products:".to_string(),
            Message::NoProductsFound => "No products found".to_string(),
            Message::ProductCreated(id, name) => format!("Product '{}' created with id {}", name, id),
            Message::ProductAlreadyExists(id) => format!("A product with id {} already exists", id),
            Message::ProductUpdated(id) => format!("Product {} updated", id),
            Message::ProductDeleted(id) => format!("Product {} deleted", id),
            Message::ProductNotFound(id) => format!("Product {} not found", id),
            Message::ProductInvalidPrice(price) => format!("Invalid price: {}", price),
            Message::LowStockHeader => "Products at or below minimum stock:".to_string(),
            Message::NoLowStock => "All products are above their minimum stock".to_string(),

            // === TASK MESSAGES ===
            Message::TasksHeader => "Tasks:".to_string(),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::TaskCreated(id) => format!("Task {} created", id),
            Message::TaskStatusUpdated(id, status) => format!("Task {} is now {}", id, status),
            Message::TaskDeleted(id) => format!("Task {} deleted", id),
            Message::TaskNotFound(id) => format!("Task {} not found", id),
            Message::TaskUnknownAssignee(username) => format!("No user named '{}', the task is assigned anyway", username),
            Message::InvalidDueDate(value) => format!("Invalid due date '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM", value),

            // === ATTENDANCE MESSAGES ===
            Message::AttendanceHeader => "Attendance:".to_string(),
            Message::NoAttendanceFound => "No attendance records found".to_string(),
            Message::AttendanceMarked(employee, date) => format!("Attendance for '{}' on {} recorded", employee, date),
            Message::AttendanceUnmarked(employee, date) => format!("Attendance for '{}' on {} removed", employee, date),
            Message::AttendanceNotFound(employee, date) => format!("No attendance for '{}' on {}", employee, date),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),

            // === SUMMARY MESSAGES ===
            Message::SummaryHeader => "Summary:".to_string(),
            Message::InventoryByCategoryHeader => "Inventory value by category:".to_string(),
            Message::TasksByStatusHeader => "Tasks by status:".to_string(),
            Message::TasksByPriorityHeader => "Tasks by priority:".to_string(),
            Message::AttendanceRatesHeader => "Attendance rate by employee:".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
