use pulsec_core::builder::{Builder, BuilderStream, NodeTag};

fn tags(stream: &mut BuilderStream) -> Vec<NodeTag> {
    std::iter::from_fn(|| stream.read()).map(|n| n.tag()).collect()
}

#[test]
fn stream_is_root_first() {
    let builder = Builder::start().rydberg().detuning().uniform().constant(1, 1);
    let mut stream = BuilderStream::create(&builder);

    assert_eq!(stream.len(), 5);
    assert_eq!(
        tags(&mut stream),
        vec![
            NodeTag::Register,
            NodeTag::Rydberg,
            NodeTag::Detuning,
            NodeTag::Uniform,
            NodeTag::Constant,
        ]
    );
    assert!(stream.is_exhausted());
    assert!(stream.read().is_none());
}

#[test]
fn node_indices_follow_chain_position() {
    let builder = Builder::start().rydberg().detuning();
    let mut stream = BuilderStream::create(&builder);
    let indices: Vec<usize> = std::iter::from_fn(|| stream.read()).map(|n| n.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn copies_advance_independently() {
    let builder = Builder::start().rydberg().detuning().uniform();
    let mut stream = BuilderStream::create(&builder);
    stream.read();

    let mut copy = stream.copy();
    assert_eq!(copy.position(), 1);
    copy.read();
    copy.read();

    assert_eq!(stream.position(), 1);
    assert_eq!(stream.peek_tag(), Some(NodeTag::Rydberg));
    assert_eq!(copy.peek_tag(), Some(NodeTag::Uniform));
}

#[test]
fn read_next_skips_to_a_matching_tag() {
    let builder = Builder::start()
        .rydberg()
        .detuning()
        .uniform()
        .constant(1, 1)
        .location(0)
        .constant(2, 1);
    let mut stream = BuilderStream::create(&builder);

    let first = stream.read_next(NodeTag::SPATIAL).unwrap();
    assert_eq!(first.tag(), NodeTag::Uniform);
    assert_eq!(stream.peek_tag(), Some(NodeTag::Constant));

    let second = stream.read_next(NodeTag::SPATIAL).unwrap();
    assert_eq!(second.tag(), NodeTag::Location);

    assert!(stream.read_next(NodeTag::SPATIAL).is_none());
    assert!(stream.is_exhausted());
}

#[test]
fn peek_looks_ahead_without_moving() {
    let builder = Builder::start().rydberg().detuning();
    let stream = BuilderStream::create(&builder);
    assert_eq!(stream.peek(2).map(|n| n.tag()), Some(NodeTag::Detuning));
    assert!(stream.peek(3).is_none());
    assert_eq!(stream.position(), 0);
}
