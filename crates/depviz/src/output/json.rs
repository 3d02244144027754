//! JSON output: a pretty-printed array of `{"from": .., "to": ..}` objects.

use super::Serializer;
use crate::domain::Edge;
use crate::error::Result;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes the edge list as a JSON array, in edge order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

#[async_trait]
impl Serializer for JsonSerializer {
    async fn serialize(&self, edges: &[Edge], out: &mut (dyn AsyncWrite + Unpin + Send)) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(edges)?;
        json.push(b'\n');
        out.write_all(&json).await?;
        out.flush().await?;
        Ok(())
    }
}
