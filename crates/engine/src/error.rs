#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid regex syntax: {0}")]
    InvalidSyntax(#[from] regex_syntax::ast::Error),

    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChangesetError {
    #[error("code block has no associated file path")]
    MissingPath,

    #[error("search text not found in {path}: {search:?}")]
    SearchNotFound { path: String, search: String },

    #[error("hunks targeted non-existent file {0}; use a raw body to create a file")]
    HunksOnMissingFile(String),

    #[error("raw body targeted existing file {0}; use search/replace hunks to modify it")]
    BodyOnExistingFile(String),

    #[error("block for {0} contained neither search/replace hunks nor a creation body")]
    EmptyBlock(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
