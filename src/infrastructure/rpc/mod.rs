//! gRPC sync service (C6): generated code, domain conversions, and the
//! client/server wrappers used by C7/C8.

pub mod proto {
    tonic::include_proto!("kelda.sync.v1");
}

mod convert;

pub mod client;
pub mod server;

pub use client::SyncClient;
pub use server::{KeldaSyncService, ServerState};
