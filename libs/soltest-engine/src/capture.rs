// Combined stdout + stderr capture for child processes

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

const CHUNK_SIZE: usize = 8 * 1024;

/// Drain both streams into `combined`, interleaved in arrival order
///
/// Returns once both streams reach EOF. A missing stream counts as closed.
/// Bytes land in `combined` as they arrive, so dropping the future early
/// keeps everything read so far.
pub(crate) async fn read_combined<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    combined: &mut Vec<u8>,
) -> io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = vec![0u8; CHUNK_SIZE];
    let mut err_buf = vec![0u8; CHUNK_SIZE];

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            read = read_chunk(&mut stdout, &mut out_buf) => match read? {
                0 => stdout = None,
                n => combined.extend_from_slice(&out_buf[..n]),
            },
            read = read_chunk(&mut stderr, &mut err_buf) => match read? {
                0 => stderr = None,
                n => combined.extend_from_slice(&err_buf[..n]),
            },
        }
    }

    Ok(())
}

async fn read_chunk<R>(reader: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_both_streams_collected() {
        let mut combined = Vec::new();
        read_combined(Some(&b"out\n"[..]), Some(&b"err\n"[..]), &mut combined)
            .await
            .unwrap();

        let text = String::from_utf8(combined).unwrap();
        assert_eq!(text.len(), 8);
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
    }

    #[tokio::test]
    async fn test_missing_streams() {
        let mut combined = Vec::new();
        read_combined(Some(&b"only stdout"[..]), None::<&[u8]>, &mut combined)
            .await
            .unwrap();
        assert_eq!(combined, b"only stdout");

        let mut combined = Vec::new();
        read_combined(None::<&[u8]>, None::<&[u8]>, &mut combined)
            .await
            .unwrap();
        assert!(combined.is_empty());
    }

    #[tokio::test]
    async fn test_large_stream() {
        let big = vec![b'x'; 3 * CHUNK_SIZE + 17];
        let mut combined = Vec::new();
        read_combined(Some(&big[..]), Some(&b""[..]), &mut combined)
            .await
            .unwrap();
        assert_eq!(combined, big);
    }

    #[tokio::test]
    async fn test_abandoned_read_keeps_partial_output() {
        let (mut writer, reader) = tokio::io::duplex(64);
        writer.write_all(b"42\n").await.unwrap();

        // The writer stays open, so the read never reaches EOF
        let mut combined = Vec::new();
        let finished = tokio::time::timeout(
            Duration::from_millis(100),
            read_combined(Some(reader), None::<&[u8]>, &mut combined),
        )
        .await;

        assert!(finished.is_err());
        assert_eq!(combined, b"42\n");
        drop(writer);
    }
}
