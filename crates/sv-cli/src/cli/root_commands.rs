use clap::Subcommand;

/// Root-level commands. One per engine operation.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create an empty questionnaire.
    Create {
        /// Owning user id.
        #[arg(long)]
        owner: i64,
    },
    /// Show a questionnaire with its components.
    Get { id: String },
    /// Apply a partial update (JSON patch object).
    Update {
        id: String,
        /// e.g. '{"title":"Feedback","componentList":[...]}'
        #[arg(long)]
        patch: String,
    },
    /// Delete one or more questionnaires with everything attached.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Duplicate a questionnaire as a new draft.
    Copy { id: String },
    /// List questionnaires, newest first.
    List {
        #[arg(long)]
        owner: Option<i64>,
        /// Substring match on the title.
        #[arg(long)]
        keyword: Option<String>,
        /// Only starred (true) or unstarred (false).
        #[arg(long)]
        star: Option<bool>,
        /// List the trash instead.
        #[arg(long)]
        deleted: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Submit an answer (JSON array of {"fe_id","value"}).
    Submit {
        id: String,
        #[arg(long)]
        answers: String,
    },
    /// Show submitted answers.
    Answers { id: String },
    /// Queue a patch for the autosave worker, then drain the queue.
    Autosave {
        id: String,
        #[arg(long)]
        patch: String,
    },
}
