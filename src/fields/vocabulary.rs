use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Code {
    pub code: &'static str,
    pub decode: &'static str,
}

pub const NOT_APPLICABLE: Code = Code {
    code: "C48660",
    decode: "Not Applicable",
};

pub const YES: Code = Code {
    code: "C49488",
    decode: "Yes",
};

pub const NO: Code = Code {
    code: "C49487",
    decode: "No",
};

#[derive(Debug)]
pub struct CodeTable {
    pub name: &'static str,
    strip: &'static [&'static str],
    entries: &'static [(&'static [&'static str], Code)],
}

pub const TRIAL_PHASE: CodeTable = CodeTable {
    name: "trial phase",
    strip: &["PHASE", "TRIAL", "STUDY"],
    entries: &[
        (&["NOT APPLICABLE", "NA", "N/A"], NOT_APPLICABLE),
        (
            &["0", "ZERO", "EARLY 1"],
            Code {
                code: "C54721",
                decode: "Phase 0 Trial",
            },
        ),
        (
            &["I/II", "1/2", "I-II", "1-2"],
            Code {
                code: "C15693",
                decode: "Phase I/II Trial",
            },
        ),
        (
            &["II/III", "2/3", "II-III", "2-3"],
            Code {
                code: "C15694",
                decode: "Phase II/III Trial",
            },
        ),
        (
            &["IIA", "2A"],
            Code {
                code: "C49686",
                decode: "Phase IIa Trial",
            },
        ),
        (
            &["IIB", "2B"],
            Code {
                code: "C49688",
                decode: "Phase IIb Trial",
            },
        ),
        (
            &["IIIA", "3A"],
            Code {
                code: "C49687",
                decode: "Phase IIIa Trial",
            },
        ),
        (
            &["IIIB", "3B"],
            Code {
                code: "C49689",
                decode: "Phase IIIb Trial",
            },
        ),
        (
            &["I", "1"],
            Code {
                code: "C15600",
                decode: "Phase I Trial",
            },
        ),
        (
            &["II", "2"],
            Code {
                code: "C15601",
                decode: "Phase II Trial",
            },
        ),
        (
            &["III", "3"],
            Code {
                code: "C15602",
                decode: "Phase III Trial",
            },
        ),
        (
            &["IV", "4"],
            Code {
                code: "C15603",
                decode: "Phase IV Trial",
            },
        ),
    ],
};

pub const YES_NO: CodeTable = CodeTable {
    name: "yes/no",
    strip: &[],
    entries: &[(&["YES", "Y", "TRUE"], YES), (&["NO", "N", "FALSE"], NO)],
};

impl CodeTable {
    pub fn normalize(&self, raw: &str) -> String {
        let mut value = raw.to_uppercase();
        for word in self.strip {
            value = value.replace(word, " ");
        }
        let value = value.split_whitespace().collect::<Vec<&str>>().join(" ");
        value.replace(" / ", "/").replace(" - ", "-")
    }

    pub fn lookup(&self, raw: &str) -> Option<Code> {
        let value = self.normalize(raw);
        self.entries
            .iter()
            .find(|(accepted, _)| accepted.iter().any(|candidate| *candidate == value))
            .map(|(_, code)| *code)
    }
}

pub fn decode_trial_phase(raw: &str) -> Code {
    TRIAL_PHASE.lookup(raw).unwrap_or_else(|| {
        warn!(
            value = raw,
            vocabulary = TRIAL_PHASE.name,
            "unrecognized value, using not applicable"
        );
        NOT_APPLICABLE
    })
}

pub fn decode_yes_no(raw: &str) -> Option<Code> {
    let code = YES_NO.lookup(raw);
    if code.is_none() && !raw.trim().is_empty() {
        warn!(value = raw, vocabulary = YES_NO.name, "unrecognized value");
    }
    code
}
