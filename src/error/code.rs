/// Error codes with category prefix
///
/// Categories:
/// - IO: File system operations
/// - CSV: Input file structure and content
/// - DB: Target store operations
/// - CFG: Configuration parsing/validation
/// - INT: Unexpected internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // I/O errors (IO001-IO099)
    /// File not found
    Io001,
    /// Permission denied
    Io002,
    /// Other read failure
    Io003,

    // Input errors (CSV001-CSV099)
    /// Header does not match the expected columns
    Csv001,
    /// Row has the wrong number of fields
    Csv002,
    /// Date field is not YYYYMMDD
    Csv003,
    /// Record could not be decoded
    Csv004,

    // Store errors (DB001-DB099)
    /// Database operation failed
    Db001,
    /// Store state does not match the operation
    Db002,

    // Config errors (CFG001-CFG099)
    /// Invalid config format
    Cfg001,
    /// Invalid config value
    Cfg002,

    // Internal errors (INT001-INT099)
    /// Unexpected internal error
    Int001,
}

impl ErrorCode {
    #[cfg(test)]
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::Io001,
        ErrorCode::Io002,
        ErrorCode::Io003,
        ErrorCode::Csv001,
        ErrorCode::Csv002,
        ErrorCode::Csv003,
        ErrorCode::Csv004,
        ErrorCode::Db001,
        ErrorCode::Db002,
        ErrorCode::Cfg001,
        ErrorCode::Cfg002,
        ErrorCode::Int001,
    ];

    /// Returns the error code string (e.g., "CSV001")
    pub fn as_str(&self) -> &'static str {
        match self {
            // I/O
            ErrorCode::Io001 => "IO001",
            ErrorCode::Io002 => "IO002",
            ErrorCode::Io003 => "IO003",
            // Input
            ErrorCode::Csv001 => "CSV001",
            ErrorCode::Csv002 => "CSV002",
            ErrorCode::Csv003 => "CSV003",
            ErrorCode::Csv004 => "CSV004",
            // Store
            ErrorCode::Db001 => "DB001",
            ErrorCode::Db002 => "DB002",
            // Config
            ErrorCode::Cfg001 => "CFG001",
            ErrorCode::Cfg002 => "CFG002",
            // Internal
            ErrorCode::Int001 => "INT001",
        }
    }

    /// Returns the general cause description
    pub fn cause(&self) -> &'static str {
        match self {
            // I/O
            ErrorCode::Io001 => "The specified file or directory was not found",
            ErrorCode::Io002 => "Permission denied when accessing the file or directory",
            ErrorCode::Io003 => "The file could not be read",
            // Input
            ErrorCode::Csv001 => "The header row does not list the expected OMOP CONCEPT columns",
            ErrorCode::Csv002 => "A data row does not have the same number of fields as the header",
            ErrorCode::Csv003 => "A date field is not in YYYYMMDD format",
            ErrorCode::Csv004 => "A record could not be decoded as tab-separated UTF-8",
            // Store
            ErrorCode::Db001 => "The database operation failed",
            ErrorCode::Db002 => "The stored concepts changed while the import was running",
            // Config
            ErrorCode::Cfg001 => "The configuration file has an invalid format",
            ErrorCode::Cfg002 => "A configuration value is out of range",
            // Internal
            ErrorCode::Int001 => "An unexpected internal error occurred",
        }
    }

    /// Returns remediation steps
    pub fn remediation(&self) -> &'static str {
        match self {
            // I/O
            ErrorCode::Io001 => "1. Verify the file path is correct\n2. Check if the file was moved or deleted\n3. Ensure the path exists",
            ErrorCode::Io002 => "1. Check file/directory permissions\n2. Run with appropriate privileges\n3. Verify ownership of the resource",
            ErrorCode::Io003 => "1. Check that the path points to a regular file\n2. Verify the disk is readable\n3. Re-download the vocabulary if it is truncated",
            // Input
            ErrorCode::Csv001 => "1. Check that the file is CONCEPT.csv and not another vocabulary table\n2. Ensure the file is tab-delimited\n3. Re-export the vocabulary from Athena",
            ErrorCode::Csv002 => "1. Inspect the reported line for stray tabs or quotes\n2. Ensure no line was truncated\n3. Fix the row and re-run the import",
            ErrorCode::Csv003 => "1. Use 8-digit dates such as 20200101\n2. Check the valid_start_date and valid_end_date columns\n3. Fix the row and re-run the import",
            ErrorCode::Csv004 => "1. Ensure the file is UTF-8 encoded\n2. Check for unbalanced double quotes\n3. Re-export the vocabulary from Athena",
            // Store
            ErrorCode::Db001 => "1. Verify the database path is writable\n2. Check that no other process holds a lock on it\n3. Re-run the import; no rows were committed",
            ErrorCode::Db002 => "1. Make sure only one import runs at a time\n2. Re-run the import; no rows were committed",
            // Config
            ErrorCode::Cfg001 => "1. Check the configuration file syntax\n2. Validate against the expected format\n3. Restore from a backup if corrupted",
            ErrorCode::Cfg002 => "1. Use a progress interval of at least 1\n2. Check OMOP_IMPORT_* environment variables\n3. Use default configuration as reference",
            // Internal
            ErrorCode::Int001 => "1. Try the operation again\n2. Check for updates to omop-import\n3. Report the issue with RUST_LOG=debug output",
        }
    }
}
