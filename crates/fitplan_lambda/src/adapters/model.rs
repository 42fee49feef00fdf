pub trait TextModel {
    /// Sends one prompt to the hosted model and returns the full reply text.
    fn generate(&self, prompt: &str) -> Result<String, String>;
}
