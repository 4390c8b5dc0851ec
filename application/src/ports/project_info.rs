//! Project info port
//!
//! The client needs two things from its host project: the root directory
//! (working directory of the agent and `cwd` of the start call) and a
//! pre-formatted preamble for the first prompt.

use pilot_domain::ProjectContext;

/// Supplies the host project's context.
///
/// Called on every connect and every session start, so implementations may
/// re-detect the project each time.
pub trait ProjectInfoProvider: Send + Sync {
    fn project_context(&self) -> ProjectContext;
}

/// Fixed context, for hosts that already know their project (and for tests).
#[derive(Debug, Clone, Default)]
pub struct StaticProjectInfo {
    context: ProjectContext,
}

impl StaticProjectInfo {
    pub fn new(context: ProjectContext) -> Self {
        Self { context }
    }
}

impl ProjectInfoProvider for StaticProjectInfo {
    fn project_context(&self) -> ProjectContext {
        self.context.clone()
    }
}
