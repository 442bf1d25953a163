/// Core validation trait shared by the engine's input checks.
///
/// Validators are small stateless structs; callers decide what a failure
/// means. The color resolver, for example, treats a failed hex check as "this
/// is a theme token" rather than as an error.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use engine::validation::Validator;
///
/// struct NonBlank;
/// impl Validator<str> for NonBlank {
///     type Error = String;
///
///     fn validate(&self, input: &str) -> Result<(), Self::Error> {
///         if input.trim().is_empty() {
///             Err("Input cannot be blank".to_string())
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;

    /// Convenience wrapper for callers that only need a yes/no answer
    fn is_valid(&self, input: &T) -> bool {
        self.validate(input).is_ok()
    }
}
