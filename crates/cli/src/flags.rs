use clap::ValueEnum;

/// How the source directory and classpath of a checkout are determined
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LayoutFlag {
    /// Ask `defects4j export` (requires a Defects4J working directory)
    #[default]
    Defects4j,
    /// Look for well-known source directories; no classpath
    Probe,
}

impl LayoutFlag {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            LayoutFlag::Defects4j => "defects4j",
            LayoutFlag::Probe => "probe",
        }
    }
}
