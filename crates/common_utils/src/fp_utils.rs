//! Functional programming utilities

/// Run the closure when the predicate holds, typically to return an error on
/// a failed precondition.
pub fn when<W, E>(predicate: bool, closure: W) -> Result<(), E>
where
    W: FnOnce() -> Result<(), E>,
{
    if predicate {
        closure()
    } else {
        Ok(())
    }
}
