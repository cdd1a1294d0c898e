use crate::storage::keys::Folder;

pub fn purpose_for(env: &str, suffix: &str) -> String {
    format!("{}-{suffix}", env.to_lowercase())
}

/// `"{purpose}-{stem}"` where the stem is everything before the first dot.
pub fn derive_job_id(purpose: &str, base_filename: &str) -> String {
    let stem = base_filename.split('.').next().unwrap_or(base_filename);
    format!("{purpose}-{stem}")
}

pub fn derive_output_key(env: &str, job_id: &str) -> String {
    Folder::Output.key(env, &format!("{job_id}.json"))
}
