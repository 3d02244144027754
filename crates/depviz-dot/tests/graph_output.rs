//! Integration tests for writing complete DOT graphs.

use depviz_dot::{DotWriter, Error};
use rstest::rstest;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// An async writer whose every write fails.
struct BrokenPipe;

impl AsyncWrite for BrokenPipe {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn writes_labelled_graph() {
    let labels = ["fastapi", "starlette", "pydantic", "asyncio"];
    let edges = [(1, 2), (1, 3), (2, 4)];

    let mut out = Vec::new();
    let mut writer = DotWriter::new(&mut out);
    writer.begin_digraph("dependencies").await.unwrap();
    for (i, label) in labels.iter().enumerate() {
        writer.node(i + 1, label).await.unwrap();
    }
    for (from, to) in edges {
        writer.edge(from, to).await.unwrap();
    }
    writer.finish().await.unwrap();
    drop(writer);

    let out = String::from_utf8(out).unwrap();
    let expected = "digraph dependencies {
\t1 [label=\"fastapi\"];
\t2 [label=\"starlette\"];
\t3 [label=\"pydantic\"];
\t4 [label=\"asyncio\"];
\t1 -> 2;
\t1 -> 3;
\t2 -> 4;
}
";
    assert_eq!(out, expected);
}

#[rstest]
#[case::quote("say \"hi\"", "\t1 [label=\"say \\\"hi\\\"\"];\n")]
#[case::backslash("C:\\deps", "\t1 [label=\"C:\\\\deps\"];\n")]
#[case::scoped("@vue/compiler-core", "\t1 [label=\"@vue/compiler-core\"];\n")]
#[tokio::test]
async fn escapes_labels(#[case] label: &str, #[case] expected_line: &str) {
    let mut out = Vec::new();
    let mut writer = DotWriter::new(&mut out);
    writer.begin_digraph("g").await.unwrap();
    writer.node(1, label).await.unwrap();
    writer.finish().await.unwrap();
    drop(writer);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(expected_line), "unexpected output: {out}");
}

#[tokio::test]
async fn surfaces_io_errors_on_finish() {
    // Small statements sit in the buffer; the failure shows up on flush.
    let mut writer = DotWriter::new(BrokenPipe);
    writer.begin_digraph("g").await.unwrap();
    writer.edge(1, 2).await.unwrap();
    let err = writer.finish().await.unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}
