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

//! Resolution of the type names found in a container to decoders supplied by the host.
//!
//! The reader never looks inside product bytes. When a source is opened, every catalog entry is
//! handed to a [`TypeRegistry`] together with the slot its bytes will be stored in. The registry
//! answers with a [`Decoder`] that the host later uses to turn those bytes into a value.

use crate::{PdsResult, products::SlotIndex};
use std::{any::Any, collections::HashMap, fmt, sync::Arc};

/// Turns the raw bytes of one product into a value.
pub trait Decoder: fmt::Debug + Send + Sync {
    /// The type name this decoder was registered under.
    fn type_name(&self) -> &str;

    fn decode(&self, bytes: &[u8]) -> PdsResult<Box<dyn Any + Send>>;
}

/// Lookup from type names to decoders.
pub trait TypeRegistry {
    /// Finds the decoder for the product `product_name` of type `type_name`, whose bytes will be
    /// available in `slot`. `None` makes the source fail with
    /// [`ErrorKind::UnknownType`](crate::ErrorKind::UnknownType).
    fn resolve(
        &self,
        slot: SlotIndex,
        product_name: &str,
        type_name: &str,
    ) -> Option<Arc<dyn Decoder>>;
}

impl<F> TypeRegistry for F
where
    F: Fn(SlotIndex, &str, &str) -> Option<Arc<dyn Decoder>>,
{
    fn resolve(
        &self,
        slot: SlotIndex,
        product_name: &str,
        type_name: &str,
    ) -> Option<Arc<dyn Decoder>> {
        self(slot, product_name, type_name)
    }
}

/// A [`TypeRegistry`] backed by a map from type name to decoder.
#[derive(Clone, Debug, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `decoder` under its own type name, returning the decoder it replaces.
    pub fn register(&mut self, decoder: Arc<dyn Decoder>) -> Option<Arc<dyn Decoder>> {
        self.decoders
            .insert(decoder.type_name().to_owned(), decoder)
    }

    /// Same as [`register`](Self::register), for chaining.
    pub fn with(mut self, decoder: impl Decoder + 'static) -> Self {
        self.register(Arc::new(decoder));
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl TypeRegistry for DecoderRegistry {
    fn resolve(&self, _: SlotIndex, _: &str, type_name: &str) -> Option<Arc<dyn Decoder>> {
        self.decoders.get(type_name).cloned()
    }
}

/// Decodes any product into a copy of its bytes, as a `Vec<u8>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBytesDecoder {
    type_name: String,
}

impl RawBytesDecoder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Decoder for RawBytesDecoder {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn decode(&self, bytes: &[u8]) -> PdsResult<Box<dyn Any + Send>> {
        Ok(Box::new(bytes.to_vec()))
    }
}

/// Resolves every type to a [`RawBytesDecoder`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughRegistry;

impl TypeRegistry for PassthroughRegistry {
    fn resolve(&self, _: SlotIndex, _: &str, type_name: &str) -> Option<Arc<dyn Decoder>> {
        Some(Arc::new(RawBytesDecoder::new(type_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Details;
    use pds_test_helper::TestResult;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct U32Decoder;

    impl Decoder for U32Decoder {
        fn type_name(&self) -> &str {
            "u32"
        }

        fn decode(&self, bytes: &[u8]) -> PdsResult<Box<dyn Any + Send>> {
            let bytes: [u8; 4] = bytes.try_into().map_err(|_| Details::Decode {
                type_name: self.type_name().to_owned(),
                reason: format!("expected 4 bytes, got {}", bytes.len()),
            })?;
            Ok(Box::new(u32::from_ne_bytes(bytes)))
        }
    }

    #[test]
    fn test_decoder_registry() -> TestResult {
        let registry = DecoderRegistry::new()
            .with(U32Decoder)
            .with(RawBytesDecoder::new("blob"));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("u32"));
        assert!(registry.resolve(SlotIndex::new(0), "p", "missing").is_none());

        let decoder = registry
            .resolve(SlotIndex::new(0), "p", "u32")
            .ok_or_else(|| anyhow::anyhow!("u32 not resolved"))?;
        let value = decoder.decode(&7u32.to_ne_bytes())?;
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));

        let err = decoder.decode(&[1, 2]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Decode);

        Ok(())
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = DecoderRegistry::new();
        assert!(registry.register(Arc::new(RawBytesDecoder::new("a"))).is_none());
        let replaced = registry.register(Arc::new(RawBytesDecoder::new("a")));
        assert_eq!(replaced.map(|d| d.type_name().to_owned()), Some("a".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_passthrough() -> TestResult {
        let decoder = PassthroughRegistry
            .resolve(SlotIndex::new(3), "p", "Anything")
            .ok_or_else(|| anyhow::anyhow!("passthrough never fails"))?;
        assert_eq!(decoder.type_name(), "Anything");
        let value = decoder.decode(b"xyz")?;
        assert_eq!(value.downcast_ref::<Vec<u8>>(), Some(&b"xyz".to_vec()));

        Ok(())
    }

    #[test]
    fn test_closure_registry() {
        let only_first = |slot: SlotIndex, _: &str, type_name: &str| {
            (slot.get() == 0).then(|| Arc::new(RawBytesDecoder::new(type_name)) as Arc<dyn Decoder>)
        };
        assert!(only_first.resolve(SlotIndex::new(0), "p", "T").is_some());
        assert!(only_first.resolve(SlotIndex::new(1), "p", "T").is_none());
    }
}
