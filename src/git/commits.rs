//! Git commit log parsing
//!
//! Turns the raw output of `git log --format=LOG_FORMAT` (and
//! `git stash list` with the same format) into structured commit records.
//!
//! Each record is laid out as
//! `HASH\nNAME\nEMAIL\nAUTHOR_EPOCH\nCOMMIT_EPOCH\nPARENTS\nMESSAGE\0`.
//! The message is the only field that may contain newlines, so it is
//! delimited by the NUL terminator alone.

/// Format string passed to `git log --format=` to produce parseable output
pub const LOG_FORMAT: &str = "%H%n%aN%n%aE%n%at%n%ct%n%P%n%B%x00";

/// Length of a full SHA-1 object id in hex
const HASH_LEN: usize = 40;

/// Length of an abbreviated hash
const SHORT_HASH_LEN: usize = 7;

/// A single commit parsed from git log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full 40 character commit hash
    pub hash: String,
    /// Parent hashes, empty for a root commit
    pub parent_hashes: Vec<String>,
    /// Author name
    pub author_name: String,
    /// Author email (may be empty)
    pub author_email: String,
    /// Author date, seconds since epoch
    pub author_timestamp: i64,
    /// Commit date, seconds since epoch
    pub commit_timestamp: i64,
    /// Full commit message without the trailing newline
    pub message: String,
    /// Position in the parsed output (the N in `stash@{N}` for stashes)
    pub index: usize,
}

impl CommitRecord {
    /// Abbreviated commit hash (7 characters)
    pub fn short_hash(&self) -> &str {
        abbreviate(&self.hash)
    }

    /// First parent, or the commit itself when it has no parents
    pub fn parent_hash(&self) -> &str {
        self.parent_hashes
            .first()
            .map(String::as_str)
            .unwrap_or(&self.hash)
    }

    /// Abbreviated form of [`CommitRecord::parent_hash`]
    pub fn parent_short_hash(&self) -> &str {
        abbreviate(self.parent_hash())
    }

    /// Whether this commit has no parents
    pub fn is_root(&self) -> bool {
        self.parent_hashes.is_empty()
    }

    /// Whether this commit joins more than one line of history
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

fn abbreviate(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}

/// Parse raw git log output into commit records
///
/// Records are returned in the order git emitted them. An unterminated
/// trailing fragment ends parsing; a terminated record with malformed header
/// fields is skipped.
pub fn parse_commit_log(raw: &str) -> Vec<CommitRecord> {
    let mut commits = Vec::new();
    let mut scanner = Scanner::new(raw);
    // Position among terminated records, skipped ones included
    let mut index = 0;

    loop {
        // Records are separated by the newline git appends after each entry
        scanner.skip_newlines();
        if scanner.is_empty() {
            break;
        }

        let Some(record) = scanner.next_record() else {
            log::debug!("dropping unterminated log fragment at byte {}", scanner.pos);
            break;
        };

        match parse_record(record, index) {
            Some(commit) => commits.push(commit),
            None => log::debug!("skipping malformed log record {} ({} bytes)", index, record.len()),
        }
        index += 1;
    }

    commits
}

/// Parse the body of one NUL-terminated record
fn parse_record(record: &str, index: usize) -> Option<CommitRecord> {
    let mut fields = Scanner::new(record);

    let hash = fields.line()?;
    if hash.len() != HASH_LEN || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let author_name = fields.line()?;
    let author_email = fields.line()?;
    let author_timestamp = fields.line()?.trim().parse::<i64>().ok()?;
    let commit_timestamp = fields.line()?.trim().parse::<i64>().ok()?;

    // The parent line is the last header; it may end the record outright
    let (parents, message) = match fields.line() {
        Some(parents) => (parents, fields.rest()),
        None => (fields.rest(), ""),
    };

    let parent_hashes = if parents.is_empty() {
        Vec::new()
    } else {
        parents.split(' ').map(str::to_string).collect()
    };

    Some(CommitRecord {
        hash: hash.to_string(),
        parent_hashes,
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        author_timestamp,
        commit_timestamp,
        message: message.strip_suffix('\n').unwrap_or(message).to_string(),
        index,
    })
}

/// Forward-only cursor over a string slice
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_newlines(&mut self) {
        let rest = self.remaining();
        self.pos += rest.len() - rest.trim_start_matches(['\n', '\r']).len();
    }

    /// Everything up to the next NUL, consuming the NUL
    fn next_record(&mut self) -> Option<&'a str> {
        let rest = self.remaining();
        let end = rest.find('\0')?;
        self.pos += end + 1;
        Some(&rest[..end])
    }

    /// Everything up to the next newline, consuming the newline
    fn line(&mut self) -> Option<&'a str> {
        let rest = self.remaining();
        let end = rest.find('\n')?;
        self.pos += end + 1;
        Some(&rest[..end])
    }

    fn rest(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.input.len();
        rest
    }
}
