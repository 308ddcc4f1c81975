/// Every piece of user-facing text the command layer prints.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigModuleStorage,
    ConfigModuleAuth,
    ConfigSaved,
    ConfigDefaultsSaved,
    PromptDataDir,
    PromptMaxAttempts,
    PromptLockoutMinutes,

    // === AUTHENTICATION MESSAGES ===
    PromptUsername,
    PromptPassword,
    PromptPasswordConfirm,
    PromptNewPassword,
    PasswordMismatch,
    LoginSuccess(String),
    LastLogin(String),
    InvalidCredentials,
    AccountLocked(String),
    AdminRequired,
    AdminLoginHeader,
    UserRegistered(String),
    PasswordResetDone(String),
    PasswordResetFailed,

    // === USER MESSAGES ===
    PromptFullName,
    PromptEmail,
    PromptDepartment,
    PromptPosition,
    PromptPhoneNumber,
    UsersHeader,
    UserCreated(String),
    UserAlreadyExists(String),
    UserDeleted(String),
    UserNotFound(String),
    UserUnlocked(String),
    ConfirmDeleteUser(String),
    CannotDeleteSelf,

    // === PRODUCT MESSAGES ===
    ProductsHeader,
    NoProductsFound,
    ProductCreated(u32, String),
    ProductAlreadyExists(u32),
    ProductUpdated(u32),
    ProductDeleted(u32),
    ProductNotFound(u32),
    ProductInvalidPrice(f64),
    LowStockHeader,
    NoLowStock,

    // === TASK MESSAGES ===
    TasksHeader,
    NoTasksFound,
    TaskCreated(u32),
    TaskStatusUpdated(u32, String),
    TaskDeleted(u32),
    TaskNotFound(u32),
    TaskUnknownAssignee(String),
    InvalidDueDate(String),

    // === ATTENDANCE MESSAGES ===
    AttendanceHeader,
    NoAttendanceFound,
    AttendanceMarked(String, String),
    AttendanceUnmarked(String, String),
    AttendanceNotFound(String, String),
    InvalidDate(String),

    // === SUMMARY MESSAGES ===
    SummaryHeader,
    InventoryByCategoryHeader,
    TasksByStatusHeader,
    TasksByPriorityHeader,
    AttendanceRatesHeader,

    // === GENERAL MESSAGES ===
    OperationCancelled,
}
