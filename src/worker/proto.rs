//! Wire messages for the fetch worker. Hand-written prost structs: the
//! protocol is two messages, codegen would be overhead.

/// One fetch order. Framed by connection: the client half-closes after
/// writing a single encoded request.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchRequest {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub url: ::prost::alloc::string::String,
    #[prost(uint32, tag = "3")]
    pub timeout_secs: u32,
}

/// The worker's answer. `status_code = 0` (the protobuf default) means the
/// upstream fetch itself failed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchResponse {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint32, tag = "2")]
    pub status_code: u32,
    #[prost(string, tag = "3")]
    pub data: ::prost::alloc::string::String,
}
