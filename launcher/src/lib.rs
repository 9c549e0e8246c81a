//! Local launcher: starts `advice-service` and `frontend-service` as child
//! processes, waits for both ports, then supervises them until Ctrl+C.
pub mod cli;
pub mod ports;
pub mod supervisor;
