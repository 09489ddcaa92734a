use crate::error::ApplicationError;

/// Values an execution unit substitutes into an application's args template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeParams {
    pub threads: u64,
    pub duration: u64,
    pub noise: u64,
    pub initial_size: u64,
    /// Index of the execution unit in the current benchmarking run.
    pub index: u64,
}

/// Placeholders understood in args templates.
pub const PLACEHOLDERS: [&str; 5] = ["threads", "noise", "duration", "index", "initial_size"];

impl RuntimeParams {
    fn value_of(&self, placeholder: &str) -> Option<u64> {
        match placeholder {
            "threads" => Some(self.threads),
            "noise" => Some(self.noise),
            "duration" => Some(self.duration),
            "index" => Some(self.index),
            "initial_size" => Some(self.initial_size),
            _ => None,
        }
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and `{placeholder}` segments.
///
/// `{{` and `}}` stand for literal braces.
fn parse(template: &str) -> Result<Vec<Segment<'_>>, ApplicationError> {
    let malformed = || ApplicationError::MalformedTemplate {
        template: template.to_owned(),
    };

    let mut segments = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            segments.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            segments.push(Segment::Literal("{"));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            segments.push(Segment::Literal("}"));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(malformed());
        } else {
            let end = tail.find('}').ok_or_else(malformed)?;
            let name = &tail[1..end];
            if name.contains('{') {
                return Err(malformed());
            }
            segments.push(Segment::Placeholder(name));
            rest = &tail[end + 1..];
        }
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    Ok(segments)
}

/// Check that every placeholder of `template` is known.
pub fn validate(template: &str) -> Result<(), ApplicationError> {
    for segment in parse(template)? {
        if let Segment::Placeholder(name) = segment {
            if !PLACEHOLDERS.contains(&name) {
                return Err(ApplicationError::UnknownPlaceholder {
                    placeholder: name.to_owned(),
                });
            }
        }
    }
    Ok(())
}

/// Substitute the runtime parameters into `template`.
pub fn render(template: &str, params: &RuntimeParams) -> Result<String, ApplicationError> {
    let mut rendered = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Placeholder(name) => {
                let value =
                    params
                        .value_of(name)
                        .ok_or_else(|| ApplicationError::UnknownPlaceholder {
                            placeholder: name.to_owned(),
                        })?;
                rendered.push_str(&value.to_string());
            }
        }
    }
    Ok(rendered)
}
