#[cfg(test)]
mod pipeline_tests;
