/// Error code registry for flowrun
///
/// Error codes are organized by category:
/// - 1100-1199: Configuration errors
/// - 2000-2999: Load errors
/// - 3000-3999: Entry point errors
/// - 4000-4999: Execution errors
/// - 5000-5999: Host protocol errors
/// - 9000-9999: Internal errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1100-1199)
    pub const CONFIG_READ_FAILED: u16 = 1101;
    pub const CONFIG_INVALID_TOML: u16 = 1102;

    // Load errors (2000-2999)
    pub const LOAD_GENERIC: u16 = 2000;
    pub const LOAD_NOT_FOUND: u16 = 2001;
    pub const LOAD_NOT_A_FILE: u16 = 2002;
    pub const LOAD_UNSUPPORTED_TYPE: u16 = 2003;
    pub const LOAD_INTERPRETER_UNAVAILABLE: u16 = 2004;
    pub const LOAD_IMPORT_FAILED: u16 = 2005;
    pub const LOAD_HOST_EXITED: u16 = 2006;

    // Entry point errors (3000-3999)
    pub const ENTRY_POINT_MISSING: u16 = 3001;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_RAISED: u16 = 4001;
    pub const EXEC_HOST_EXITED: u16 = 4002;
    pub const EXEC_READ_FAILED: u16 = 4003;

    // Protocol errors (5000-5999)
    pub const PROTOCOL_MALFORMED: u16 = 5001;
    pub const PROTOCOL_UNEXPECTED: u16 = 5002;

    // Internal errors (9000-9999)
    pub const INTERNAL_GENERIC: u16 = 9000;
    pub const INTERNAL_INVALID_TRANSITION: u16 = 9001;
}

/// Get a short description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_READ_FAILED => "Configuration file could not be read",
        ErrorCode::CONFIG_INVALID_TOML => "Configuration file is not valid TOML",

        ErrorCode::LOAD_GENERIC => "Flow could not be loaded",
        ErrorCode::LOAD_NOT_FOUND => "Flow file not found",
        ErrorCode::LOAD_NOT_A_FILE => "Flow path is not a regular file",
        ErrorCode::LOAD_UNSUPPORTED_TYPE => "Flow file type is not supported",
        ErrorCode::LOAD_INTERPRETER_UNAVAILABLE => "Flow interpreter could not be started",
        ErrorCode::LOAD_IMPORT_FAILED => "Flow module failed to import",
        ErrorCode::LOAD_HOST_EXITED => "Flow host exited during load",

        ErrorCode::ENTRY_POINT_MISSING => "Flow has no entry point",

        ErrorCode::EXEC_GENERIC => "Flow execution failed",
        ErrorCode::EXEC_RAISED => "Flow entry point raised an error",
        ErrorCode::EXEC_HOST_EXITED => "Flow host exited before reporting a result",
        ErrorCode::EXEC_READ_FAILED => "Flow host output could not be read",

        ErrorCode::PROTOCOL_MALFORMED => "Malformed message from flow host",
        ErrorCode::PROTOCOL_UNEXPECTED => "Unexpected message from flow host",

        ErrorCode::INTERNAL_GENERIC => "Internal error",
        ErrorCode::INTERNAL_INVALID_TRANSITION => "Invalid invocation state transition",

        _ => "Unknown error",
    }
}
