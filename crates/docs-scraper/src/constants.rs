//! Fixed site addresses, page patterns and column labels.

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const PEP_DOC_URL: &str = "https://peps.python.org/";

/// Matches sidebar entries such as "Python 3.13 (stable)".
pub const PYTHON_VERSION_STATUS: &str = r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)";

/// Matches the A4 PDF archive link on the downloads page.
pub const PDF_ZIP_LINK: &str = r".+pdf-a4\.zip$";

/// Sidebar marker of the list that holds every documented version.
pub const ALL_VERSIONS_MARKER: &str = "All versions";

pub const WHATS_NEW_HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];
pub const LATEST_VERSIONS_HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];
pub const STATUS_HEADER: [&str; 2] = ["Status", "Quantity"];

pub const DOWNLOADS_DIR: &str = "downloads";
pub const RESULTS_DIR: &str = "results";

/// File-name timestamp for CSV results.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Statuses a proposal may carry on its own page, by the letter shown in the index.
pub fn expected_statuses(letter: &str) -> &'static [&'static str] {
    match letter {
        "A" => &["Active", "Accepted"],
        "D" => &["Deferred"],
        "F" => &["Final"],
        "P" => &["Provisional"],
        "R" => &["Rejected"],
        "S" => &["Superseded"],
        "W" => &["Withdrawn"],
        "" => &["Draft", "Active"],
        _ => &[],
    }
}
