use crate::value::Value;

/// Packs call-site arguments into an ordered sequence of erased values
///
/// Implemented for tuples of up to four items (anything `Into<Value>`), and
/// for already-erased `Vec<Value>`, slices and arrays. Tuples longer than
/// the supported arity exist so such calls fail with
/// [`CallError::UnsupportedArity`](crate::CallError::UnsupportedArity)
/// instead of failing to compile.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Value>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl<A: Into<Value>> IntoArgs for (A,) {
    fn into_args(self) -> Vec<Value> {
        vec![self.0.into()]
    }
}

impl<A: Into<Value>, B: Into<Value>> IntoArgs for (A, B) {
    fn into_args(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into()]
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> IntoArgs for (A, B, C) {
    fn into_args(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<A, B, C, D> IntoArgs for (A, B, C, D)
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
    D: Into<Value>,
{
    fn into_args(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

impl IntoArgs for Vec<Value> {
    fn into_args(self) -> Vec<Value> {
        self
    }
}

impl IntoArgs for &[Value] {
    fn into_args(self) -> Vec<Value> {
        self.to_vec()
    }
}

impl<const N: usize> IntoArgs for [Value; N] {
    fn into_args(self) -> Vec<Value> {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples_pack_in_order() {
        assert!(().into_args().is_empty());
        assert_eq!((5,).into_args(), vec![Value::Int(5)]);
        assert_eq!(
            (15, "x").into_args(),
            vec![Value::Int(15), Value::Text("x".to_string())]
        );
        assert_eq!((1, 2, 3, 4).into_args().len(), 4);
    }

    #[test]
    fn erased_sequences_pass_through() {
        let args = vec![Value::Float(1.5), Value::Bool(true)];
        assert_eq!(args.as_slice().into_args(), args);
        assert_eq!([Value::Unit].into_args(), vec![Value::Unit]);
        assert_eq!(args.clone().into_args(), args);
    }
}
