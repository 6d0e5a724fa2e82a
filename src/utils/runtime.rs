use anyhow::Result;

/// Every command runs on the current thread, nothing in freeflow needs parallelism.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
