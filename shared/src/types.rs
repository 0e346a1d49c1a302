/// Workspace-wide result type. Typed errors from `domain::error` travel inside
/// it and can be recovered with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
