// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{
    PdsResult,
    error::Details,
    products::BodyLayout,
    registry::TypeRegistry,
    source::{EmptySource, PdsSource, Source, container::open_file},
};
use std::{path::Path, str::FromStr};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The source backends that can be created by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum SourceKind {
    /// Reads a PDS container. Options are the file name, optionally followed by `:` and a
    /// [`BodyLayout`] name, e.g. `run42.pds:segmented`.
    #[strum(serialize = "PDSSource")]
    Pds,
    /// Produces events without products. Options are ignored.
    #[strum(serialize = "EmptySource")]
    Empty,
}

impl SourceKind {
    pub fn parse(name: &str) -> PdsResult<Self> {
        Self::from_str(name).map_err(|_| Details::UnknownSourceKind(name.to_owned()).into())
    }

    /// Creates a source of this kind producing at most `max_events` events.
    pub fn create(
        self,
        options: &str,
        max_events: u64,
        registry: &dyn TypeRegistry,
    ) -> PdsResult<Box<dyn Source + Send>> {
        match self {
            SourceKind::Pds => {
                let (path, body_layout) = split_options(options);
                if path.is_empty() {
                    return Err(Details::MissingFileName(self.into()).into());
                }
                let source = PdsSource::builder(open_file(Path::new(path))?)
                    .registry(registry)
                    .max_events(max_events)
                    .body_layout(body_layout)
                    .build()?;
                Ok(Box::new(source))
            }
            SourceKind::Empty => Ok(Box::new(EmptySource::new(max_events))),
        }
    }
}

fn split_options(options: &str) -> (&str, BodyLayout) {
    options
        .rsplit_once(':')
        .and_then(|(path, layout)| Some((path, BodyLayout::from_str(layout).ok()?)))
        .unwrap_or((options, BodyLayout::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, registry::PassthroughRegistry};
    use pds_test_helper::{ContainerBuilder, TestResult, segmented_body};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("PDSSource", SourceKind::Pds)]
    #[case("EmptySource", SourceKind::Empty)]
    fn test_parse(#[case] name: &str, #[case] kind: SourceKind) -> TestResult {
        assert_eq!(SourceKind::parse(name)?, kind);
        assert_eq!(kind.to_string(), name);

        Ok(())
    }

    #[test]
    fn test_unknown_kind() {
        let err = SourceKind::parse("RootSource").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Unknown source type \"RootSource\"");
    }

    #[test]
    fn test_all_kinds_round_trip_names() -> TestResult {
        for kind in SourceKind::iter() {
            assert_eq!(SourceKind::parse(kind.into())?, kind);
        }

        Ok(())
    }

    #[rstest]
    #[case("run.pds", "run.pds", BodyLayout::Opaque)]
    #[case("run.pds:segmented", "run.pds", BodyLayout::Segmented)]
    #[case("run.pds:opaque", "run.pds", BodyLayout::Opaque)]
    #[case("C:/data/run.pds", "C:/data/run.pds", BodyLayout::Opaque)]
    #[case("", "", BodyLayout::Opaque)]
    fn test_split_options(
        #[case] options: &str,
        #[case] path: &str,
        #[case] layout: BodyLayout,
    ) {
        assert_eq!(split_options(options), (path, layout));
    }

    #[test]
    fn test_create_empty() -> TestResult {
        let mut source = SourceKind::Empty.create("", 3, &PassthroughRegistry)?;
        assert_eq!(source.number_of_events(), Some(3));
        assert!(source.goto_event(2)?);
        assert!(!source.goto_event(3)?);

        Ok(())
    }

    #[test]
    fn test_create_pds_needs_file_name() {
        let err = SourceKind::Pds
            .create("", 10, &PassthroughRegistry)
            .err()
            .map(|e| (e.kind(), e.to_string()));
        assert_eq!(
            err,
            Some((
                ErrorKind::Configuration,
                "Source PDSSource needs a file name".to_owned()
            ))
        );
    }

    #[test]
    fn test_create_pds() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("two.pds");
        let container = ContainerBuilder::new()
            .type_name("Foo")
            .type_name("Bar")
            .product(0, "p1")
            .product(1, "p2")
            .event(segmented_body(&[b"a", b"b"]))
            .event(segmented_body(&[b"c", b"d"]));
        std::fs::write(&path, container.build())?;

        let options = format!("{}:segmented", path.display());
        let mut source = SourceKind::Pds.create(&options, 1, &PassthroughRegistry)?;
        let names: Vec<&str> = source.products().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["p1", "p2"]);
        assert_eq!(source.number_of_events(), None);
        assert!(source.goto_event(0)?);
        assert!(!source.goto_event(1)?);

        Ok(())
    }
}
