mod http_client;

pub(crate) use http_client::HttpTranscriptionClient;
