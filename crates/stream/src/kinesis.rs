use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_kinesis::Client;
use aws_sdk_kinesis::config::Region;
use aws_sdk_kinesis::config::http::HttpResponse;
use aws_sdk_kinesis::error::{DisplayErrorContext, SdkError};
use aws_sdk_kinesis::operation::put_record::PutRecordError;
use aws_sdk_kinesis::primitives::Blob;
use quotecast_core::config::StreamConfig;
use quotecast_core::stream::entity::PublishAck;
use quotecast_core::stream::error::StreamError;
use quotecast_core::stream::port::StreamSink;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// A sink that writes records to an AWS Kinesis Data Stream via `PutRecord`.
///
/// # Invariants
/// * The SDK client is built once and shared for the process lifetime.
/// * SDK-level retries are disabled; one call is one attempt.
/// * Credentials come from the default AWS provider chain.
pub struct KinesisSink {
    /// The Kinesis client.
    client: Client,
}

impl KinesisSink {
    /// # Summary
    /// Builds a `KinesisSink` from stream configuration.
    ///
    /// # Logic
    /// 1. Loads the shared AWS config for the configured region.
    /// 2. Applies the explicit operation timeout and disables retries.
    /// 3. Applies the endpoint override when present (e.g. LocalStack).
    ///
    /// # Arguments
    /// * `config` - Stream section of the application config.
    ///
    /// # Returns
    /// * A sink ready to publish.
    pub async fn from_config(config: &StreamConfig) -> Self {
        let timeout = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_secs))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeout);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        Self::from_client(Client::new(&shared))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Maps an SDK failure onto the stream error taxonomy.
fn classify(err: SdkError<PutRecordError, HttpResponse>) -> StreamError {
    match &err {
        SdkError::ServiceError(ctx) => StreamError::Service {
            status: ctx.raw().status().as_u16(),
            message: ctx.err().to_string(),
        },
        _ => StreamError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl StreamSink for KinesisSink {
    /// # Summary
    /// Puts a single record onto the stream.
    ///
    /// # Logic
    /// 1. Wraps the payload in a `Blob` and sends `PutRecord`.
    /// 2. A successful response becomes an HTTP 200 ack carrying shard id and sequence number.
    /// 3. Service error responses and transport failures are raised as `StreamError`.
    ///
    /// # Arguments
    /// * `stream_name` - Target stream.
    /// * `payload` - Encoded record.
    /// * `partition_key` - Routing key.
    ///
    /// # Returns
    /// * `Ok(PublishAck)` if Kinesis accepted the record.
    /// * `Err(StreamError)` otherwise.
    async fn put_record(
        &self,
        stream_name: &str,
        payload: Vec<u8>,
        partition_key: &str,
    ) -> Result<PublishAck, StreamError> {
        let output = self
            .client
            .put_record()
            .stream_name(stream_name)
            .data(Blob::new(payload))
            .partition_key(partition_key)
            .send()
            .await
            .map_err(classify)?;

        debug!(
            "PutRecord accepted on {} ({})",
            output.shard_id(),
            output.sequence_number()
        );
        // The SDK only yields an output for a 2xx response; rejections arrive as `Err` above.
        Ok(PublishAck::accepted(
            output.shard_id(),
            output.sequence_number(),
        ))
    }
}
