//! Pure sync policy: what a cycle does to one repository.
//!
//! Pull is not represented here — it is unconditionally the first step of
//! every attempt, and [`WorktreeState`] is observed *after* it. `plan`
//! turns the observed state into the ordered remainder of the attempt.

/// The fixed synthetic message for every automatic commit.
pub const AUTO_COMMIT_MESSAGE: &str = "Auto commit";

/// Repository state observed after the pull step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeState {
    /// Index or tracked-file modifications relative to HEAD.
    pub dirty: bool,
    /// Untracked file names, unfiltered.
    pub untracked: Vec<String>,
}

/// One version-control primitive the executor will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Stage exactly these files, by name.
    Stage(Vec<String>),
    /// Stage all tracked modifications.
    StageTracked,
    Commit(String),
    Push,
}

/// A candidate untracked file is staged only if its first character is
/// alphanumeric. Transient, hidden, and lock files whose names begin with
/// punctuation are deliberately left alone.
pub fn eligible_untracked(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| name.chars().next().is_some_and(char::is_alphanumeric))
        .cloned()
        .collect()
}

/// Ordered action plan for one repository, given its post-pull state.
///
/// - Eligible untracked files are staged by name — never a blanket add.
/// - A commit and push happen iff the tree is dirty or anything was staged.
/// - Clean tree, nothing eligible ⇒ empty plan; the attempt is still Synced.
pub fn plan(state: &WorktreeState) -> Vec<Action> {
    let mut actions = Vec::new();

    let eligible = eligible_untracked(&state.untracked);
    let staged_any = !eligible.is_empty();
    if staged_any {
        actions.push(Action::Stage(eligible));
    }

    if state.dirty || staged_any {
        actions.push(Action::StageTracked);
        actions.push(Action::Commit(AUTO_COMMIT_MESSAGE.to_string()));
        actions.push(Action::Push);
    }

    actions
}
