//! Result type alias for chado-gff

use super::errors::ChadoGffError;

/// Result type alias for chado-gff operations
///
/// # Examples
///
/// ```
/// use chado_gff::domain::result::Result;
/// use chado_gff::domain::errors::ChadoGffError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ChadoGffError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChadoGffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<usize> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ChadoGffError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
