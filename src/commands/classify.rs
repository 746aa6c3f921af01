use crate::args::ClassifyArgs;
use crate::commands::Out;
use crate::Config;

/// Reports the category a description would be filed under, without saving anything.
pub fn classify(config: &Config, args: &ClassifyArgs) -> Out<String> {
    let category = config.classifier().classify(&args.description, args.kind);
    Out::new(
        format!("'{}' is classified as {category}", args.description.trim()),
        category,
    )
}
