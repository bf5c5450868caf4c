// Resume parsing API: dataset batch parsing and single-document upload.
// Both paths hand the CPU-bound pipeline to tokio::task::spawn_blocking.

pub mod handlers;
