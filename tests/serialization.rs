use multirange::{Error, IntRange, IoContext, Multirange, TypeTag};

const TAG: TypeTag = IntRange::MULTIRANGE_TYPE;

fn sample() -> Multirange<IntRange> {
    Multirange::from_intervals(
        TAG,
        vec![IntRange::new(10, 20), IntRange::bounded(None, Some(-5)), IntRange::bounded(Some(40), None)],
    )
    .unwrap()
}

#[test]
fn binary_round_trip() {
    let catalog = IntRange::catalog();
    let mut ctx = IoContext::new(&catalog);
    for mr in [Multirange::empty(TAG), sample()] {
        let bytes = mr.send(&mut ctx).unwrap();
        assert_eq!(Multirange::receive(&bytes, TAG, -1, &mut ctx).unwrap(), mr);
    }
}

#[test]
fn wire_layout_is_big_endian() {
    let catalog = IntRange::catalog();
    let mut ctx = IoContext::new(&catalog);
    let mr = Multirange::from_interval(TAG, IntRange::new(1, 2)).unwrap();
    let bytes = mr.send(&mut ctx).unwrap();

    let payload = IntRange::new(1, 2).send();
    let mut expected = vec![0, 0, 0, 1];
    expected.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    expected.extend_from_slice(&payload);
    assert_eq!(bytes, expected);
}

#[test]
fn streaming_matches_buffered() {
    let catalog = IntRange::catalog();
    let mut ctx = IoContext::new(&catalog);
    let mr = sample();
    let mut streamed = Vec::new();
    mr.send_into(&mut streamed, &mut ctx).unwrap();
    assert_eq!(streamed, mr.send(&mut ctx).unwrap());
}

#[test]
fn protocol_violations_abort() {
    let catalog = IntRange::catalog();
    let mut ctx = IoContext::new(&catalog);
    let bytes = sample().send(&mut ctx).unwrap();

    let truncated = &bytes[..bytes.len() - 3];
    assert!(matches!(
        Multirange::<IntRange>::receive(truncated, TAG, -1, &mut ctx),
        Err(Error::InsufficientData)
    ));

    let mut trailing = bytes.clone();
    trailing.extend_from_slice(&[1, 2, 3]);
    assert!(matches!(
        Multirange::<IntRange>::receive(&trailing, TAG, -1, &mut ctx),
        Err(Error::TrailingData(3))
    ));
}

#[test]
fn packed_value_round_trip() {
    let mr = sample();
    let bytes = mr.as_bytes().to_vec();
    let back = Multirange::<IntRange>::from_packed(bytes).unwrap();
    assert_eq!(back, mr);
    assert_eq!(back.into_bytes().as_ref(), mr.as_bytes());
}
