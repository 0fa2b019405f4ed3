use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, StatusCode};

fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    buf.extend_from_slice(resp.status_line().as_bytes());
    buf.extend_from_slice(b"\r\n");

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Serializes a response into its wire form.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = serialize_head(resp);
    buf.extend_from_slice(&resp.body);
    buf
}

/// Sends one response: the header block first, then the body.
pub struct ResponseWriter {
    status: StatusCode,
    head: Vec<u8>,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            status: response.status,
            head: serialize_head(&response),
            body: response.body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub async fn write_to_stream<S>(&self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        write_all(stream, &self.head).await?;
        write_all(stream, &self.body).await?;
        stream.flush().await?;

        Ok(())
    }
}

async fn write_all<S>(stream: &mut S, mut buf: &[u8]) -> anyhow::Result<()>
where
    S: AsyncWrite + Unpin,
{
    while !buf.is_empty() {
        let n = stream.write(buf).await?;

        if n == 0 {
            return Err(anyhow::anyhow!("connection closed while writing"));
        }

        buf = &buf[n..];
    }

    Ok(())
}
