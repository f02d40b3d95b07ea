//! STRUCTURED-DATA scanning: zero or more bracketed SD-ELEMENTs, each an
//! SD-ID followed by zero or more `PARAM-NAME="PARAM-VALUE"` pairs, pushed to
//! a caller-supplied visitor rather than collected into an owned tree.

use crate::error::StructuredDataError;
use crate::ident::is_ident;
use crate::value::{Classifier, ValueType};

/// Optional lifecycle hooks around a STRUCTURED-DATA scan: `begin` fires once
/// before the first SD-ELEMENT (or immediately, for `NILVALUE`), `end` fires
/// once after the last. Implement on the same type as
/// [`StructuredDataVisitor`] and return it from
/// [`StructuredDataVisitor::edges`] to opt in — most visitors have no use for
/// these and can leave the default `None`.
pub trait StructuredDataEdges {
    fn begin(&mut self) -> Result<(), StructuredDataError> {
        Ok(())
    }
    fn end(&mut self) -> Result<(), StructuredDataError> {
        Ok(())
    }
}

/// Receives one call per `PARAM-NAME="PARAM-VALUE"` pair, in wire order. An
/// SD-ELEMENT with no params (`[exampleSDID@32473]`) still fires once, with
/// empty `param` and `value` slices and `value_type` [`ValueType::empty`].
pub trait StructuredDataVisitor {
    fn each(
        &mut self,
        id: &[u8],
        param: &[u8],
        value: &[u8],
        value_type: ValueType,
    ) -> Result<(), StructuredDataError>;

    /// Opt into `begin`/`end` lifecycle notifications by returning `self`
    /// (or some other [`StructuredDataEdges`] implementor) here.
    fn edges(&mut self) -> Option<&mut dyn StructuredDataEdges> {
        None
    }
}

#[derive(Clone, Copy)]
enum State {
    Start,
    IdFirst,
    IdRest,
    ParamFirst,
    ParamRest,
    ExpectQuote,
    ValueFirst,
    ValueRest,
    ValueEscaped,
    ValueClosed,
    ElementClosed,
    Done,
}

/// An identifier-like byte: printable ASCII above space, at or below `~`.
#[inline]
fn is_sd_char(c: u8) -> bool {
    (33..=126).contains(&c)
}

/// Scans a STRUCTURED-DATA field (`NILVALUE` or one or more bracketed
/// SD-ELEMENTs) starting at `input[*pos]`, advancing `*pos` past the field
/// and its trailing space on success.
///
/// `quotes_preserving` controls whether a `String`-typed `value` passed to
/// [`StructuredDataVisitor::each`] includes its surrounding quotes (`true`)
/// or has them stripped (`false`); non-`String` values never include quotes.
pub fn scan_structured_data<V: StructuredDataVisitor + ?Sized>(
    input: &[u8],
    pos: &mut usize,
    quotes_preserving: bool,
    visitor: &mut V,
) -> Result<(), StructuredDataError> {
    let p = *pos;
    if input.len() <= p {
        *pos = p;
        return Err(StructuredDataError::InvalidStructuredData);
    }
    if input.len() > p + 1 && input[p] == b'-' && input[p + 1] == b' ' {
        *pos = p + 2;
        if let Some(edges) = visitor.edges() {
            edges.begin()?;
            edges.end()?;
        }
        return Ok(());
    }

    let mut state = State::Start;
    let mut mark = p;
    let mut id: &[u8] = &[];
    let mut param: &[u8] = &[];
    let mut escapes: u32 = 0;
    let mut classifier = Classifier::new();
    let mut i = p;
    loop {
        if i >= input.len() {
            *pos = i;
            return Err(StructuredDataError::InvalidStructuredData);
        }
        let c = input[i];
        state = match state {
            State::Start => {
                if c == b'[' {
                    if let Some(edges) = visitor.edges() {
                        if let Err(e) = edges.begin() {
                            *pos = i;
                            return Err(e);
                        }
                    }
                    State::IdFirst
                } else {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            }
            State::IdFirst => {
                if is_sd_char(c) && c != b'"' && c != b'=' {
                    mark = i;
                    State::IdRest
                } else {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            }
            State::IdRest => match c {
                b' ' => {
                    id = &input[mark..i];
                    State::ParamFirst
                }
                b']' => {
                    id = &input[mark..i];
                    if let Err(e) = visitor.each(id, &[], &[], ValueType::empty()) {
                        *pos = i;
                        return Err(e);
                    }
                    State::ElementClosed
                }
                _ if is_sd_char(c) && c != b'"' && c != b'=' && i - mark < 31 => State::IdRest,
                _ => {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            },
            State::ParamFirst => {
                if is_sd_char(c) && c != b'"' && c != b'=' {
                    mark = i;
                    State::ParamRest
                } else {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            }
            State::ParamRest => {
                if c == b'=' {
                    param = &input[mark..i];
                    State::ExpectQuote
                } else if is_sd_char(c) && c != b'"' && i - mark < 31 {
                    State::ParamRest
                } else {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            }
            State::ExpectQuote => {
                if c == b'"' {
                    escapes = 0;
                    classifier = Classifier::new();
                    State::ValueFirst
                } else {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            }
            State::ValueFirst => match c {
                b'"' => {
                    if let Err(e) = visitor.each(id, param, &[], ValueType::empty()) {
                        *pos = i;
                        return Err(e);
                    }
                    State::ValueClosed
                }
                b'\\' => {
                    mark = i;
                    State::ValueEscaped
                }
                _ => {
                    classifier.step(c);
                    mark = i;
                    State::ValueRest
                }
            },
            State::ValueRest => match c {
                b'"' => {
                    let mut value = &input[mark..i];
                    let value_type = match classifier.finish() {
                        Some(ty) => ty,
                        None => {
                            if quotes_preserving {
                                value = &input[mark - 1..i + 1];
                            }
                            ValueType::String { escapes }
                        }
                    };
                    if let Err(e) = visitor.each(id, param, value, value_type) {
                        *pos = i;
                        return Err(e);
                    }
                    State::ValueClosed
                }
                b'\\' => State::ValueEscaped,
                _ => {
                    classifier.step(c);
                    State::ValueRest
                }
            },
            State::ValueEscaped => {
                if matches!(c, b'"' | b'\\' | b']') {
                    escapes += 1;
                }
                State::ValueRest
            }
            State::ValueClosed => match c {
                b' ' => State::ParamFirst,
                b']' => State::ElementClosed,
                _ => {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            },
            State::ElementClosed => match c {
                b' ' => State::Done,
                b'[' => State::IdFirst,
                _ => {
                    *pos = i;
                    return Err(StructuredDataError::InvalidStructuredData);
                }
            },
            State::Done => unreachable!("loop exits as soon as Done is reached"),
        };
        i += 1;
        if matches!(state, State::Done) {
            break;
        }
    }
    *pos = i;
    if let Some(edges) = visitor.edges() {
        edges.end()?;
    }
    Ok(())
}

/// A convenience [`StructuredDataVisitor`] that collects every SD-ELEMENT
/// into a nested map: SD-ID -> PARAM-NAME -> decoded [`ParsedValue`]. An
/// SD-ELEMENT with no params still gets an (empty) entry in the outer map.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct StructuredDataMap {
    pub elements: std::collections::BTreeMap<Vec<u8>, std::collections::BTreeMap<Vec<u8>, crate::value::ParsedValue>>,
}

impl StructuredDataVisitor for StructuredDataMap {
    fn each(
        &mut self,
        id: &[u8],
        param: &[u8],
        value: &[u8],
        value_type: ValueType,
    ) -> Result<(), StructuredDataError> {
        let params = self.elements.entry(id.to_vec()).or_default();
        if !param.is_empty() {
            params.insert(param.to_vec(), crate::value::parse_value(value, value_type));
        }
        Ok(())
    }
}

/// Scans a STRUCTURED-DATA field into a [`StructuredDataMap`], matching
/// `parse_value`'s quote-stripping (values are never returned with their
/// surrounding quotes).
pub fn parse_structured_data_map(
    input: &[u8],
    pos: &mut usize,
) -> Result<StructuredDataMap, StructuredDataError> {
    let mut map = StructuredDataMap::default();
    scan_structured_data(input, pos, false, &mut map)?;
    Ok(map)
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;
    use crate::value::ParsedValue;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Vec<u8>, Vec<u8>, Vec<u8>, ValueType)>,
        begins: u32,
        ends: u32,
    }

    impl StructuredDataVisitor for Recorder {
        fn each(&mut self, id: &[u8], param: &[u8], value: &[u8], value_type: ValueType) -> Result<(), StructuredDataError> {
            self.calls.push((id.to_vec(), param.to_vec(), value.to_vec(), value_type));
            Ok(())
        }

        fn edges(&mut self) -> Option<&mut dyn StructuredDataEdges> {
            Some(self)
        }
    }

    impl StructuredDataEdges for Recorder {
        fn begin(&mut self) -> Result<(), StructuredDataError> {
            self.begins += 1;
            Ok(())
        }

        fn end(&mut self) -> Result<(), StructuredDataError> {
            self.ends += 1;
            Ok(())
        }
    }

    #[test]
    fn nil_structured_data() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(b"- x", &mut pos, false, &mut r).unwrap();
        assert_eq!(pos, 2);
        assert_eq!(r.calls.len(), 0);
        assert_eq!(r.begins, 1);
        assert_eq!(r.ends, 1);
    }

    #[test]
    fn single_element_single_param() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(br#"[exampleSDID@32473 iut="3"] x"#, &mut pos, false, &mut r).unwrap();
        assert_eq!(r.calls.len(), 1);
        let (id, param, value, ty) = &r.calls[0];
        assert_eq!(id.as_bstr(), b"exampleSDID@32473".as_bstr());
        assert_eq!(param.as_bstr(), b"iut".as_bstr());
        assert_eq!(value.as_bstr(), b"3".as_bstr());
        assert_eq!(*ty, ValueType::Integer);
        assert_eq!(r.begins, 1);
        assert_eq!(r.ends, 1);
    }

    #[test]
    fn multiple_elements_and_params() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(
            br#"[exampleSDID@32473 iut="3" eventSource="Application"][examplePriority@32473 class="high"] x"#,
            &mut pos,
            false,
            &mut r,
        )
        .unwrap();
        assert_eq!(r.calls.len(), 3);
        assert_eq!(r.calls[0].0.as_bstr(), b"exampleSDID@32473".as_bstr());
        assert_eq!(r.calls[1].1.as_bstr(), b"eventSource".as_bstr());
        assert_eq!(r.calls[1].2.as_bstr(), b"Application".as_bstr());
        assert_eq!(r.calls[2].0.as_bstr(), b"examplePriority@32473".as_bstr());
    }

    #[test]
    fn empty_param_element_still_fires_once() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(b"[tag@0] x", &mut pos, false, &mut r).unwrap();
        assert_eq!(r.calls.len(), 1);
        assert_eq!(r.calls[0].0.as_bstr(), b"tag@0".as_bstr());
        assert_eq!(r.calls[0].1.as_bstr(), b"".as_bstr());
        assert_eq!(r.calls[0].3, ValueType::empty());
    }

    #[test]
    fn escaped_value_raw_slice_includes_backslashes() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(br#"[a@0 k="two \"quotes\""] x"#, &mut pos, false, &mut r).unwrap();
        assert_eq!(r.calls[0].2.as_bstr(), br#"two \"quotes\""#.as_bstr());
        assert_eq!(r.calls[0].3, ValueType::String { escapes: 2 });
    }

    #[test]
    fn quotes_preserving_widens_string_value() {
        let mut r = Recorder::default();
        let mut pos = 0;
        scan_structured_data(br#"[a@0 k="hi"] x"#, &mut pos, true, &mut r).unwrap();
        assert_eq!(r.calls[0].2.as_bstr(), br#""hi""#.as_bstr());
    }

    #[test]
    fn rejects_malformed() {
        let mut r = Recorder::default();
        let mut pos = 0;
        // `=` is not a legal SD-ID byte.
        assert_eq!(
            scan_structured_data(b"[a=b@0 k=\"x\"] x", &mut pos, false, &mut r),
            Err(StructuredDataError::InvalidStructuredData)
        );
    }

    #[test]
    fn parse_structured_data_map_collects_values() {
        let mut pos = 0;
        let map = parse_structured_data_map(
            br#"[exampleSDID@32473 iut="3" eventSource="Application"] x"#,
            &mut pos,
        )
        .unwrap();
        let params = &map.elements[&b"exampleSDID@32473"[..]];
        assert_eq!(params[&b"iut"[..]], ParsedValue::Integer(3));
        assert_eq!(params[&b"eventSource"[..]], ParsedValue::Str("Application".to_string()));
    }

    #[test]
    fn is_ident_used_for_sd_id_validation() {
        assert!(is_ident(b"exampleSDID@32473"));
    }
}
