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

//! The static description of a container, as declared by its preamble.

use crate::{PdsResult, error::Details};
use serde::Serialize;

/// A catalog entry binding a product name to a top-level type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    name: String,
    type_index: u32,
}

impl ProductDescriptor {
    pub fn new(name: impl Into<String>, type_index: u32) -> Self {
        Self {
            name: name.into(),
            type_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index into [`ContainerSchema::type_names`].
    pub fn type_index(&self) -> u32 {
        self.type_index
    }
}

/// Everything the preamble of a container declares. Immutable once read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSchema {
    record_names: Vec<String>,
    type_names: Vec<String>,
    nested_type_names: Vec<String>,
    products: Vec<ProductDescriptor>,
}

impl ContainerSchema {
    /// Fails if a product refers to a top-level type that is not declared.
    pub(crate) fn new(
        record_names: Vec<String>,
        type_names: Vec<String>,
        nested_type_names: Vec<String>,
        products: Vec<ProductDescriptor>,
    ) -> PdsResult<Self> {
        if let Some(product) = products
            .iter()
            .find(|p| p.type_index as usize >= type_names.len())
        {
            return Err(Details::TypeIndexOutOfRange {
                product: product.name.clone(),
                index: product.type_index,
                available: type_names.len(),
            }
            .into());
        }
        Ok(Self {
            record_names,
            type_names,
            nested_type_names,
            products,
        })
    }

    /// Names of the records stored in the container. Current containers hold a single record.
    pub fn record_names(&self) -> &[String] {
        &self.record_names
    }

    /// The top-level types, which the products refer to by index.
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    /// Types that only appear nested inside top-level types. They are not needed to resolve any
    /// product.
    pub fn nested_type_names(&self) -> &[String] {
        &self.nested_type_names
    }

    /// The product catalog, in slot order.
    pub fn products(&self) -> &[ProductDescriptor] {
        &self.products
    }

    /// The name of the top-level type of `product`, if its index is in range.
    pub fn type_name_of(&self, product: &ProductDescriptor) -> Option<&str> {
        self.type_names
            .get(product.type_index as usize)
            .map(String::as_str)
    }

    /// The catalog in slot order, each product with the name of its type.
    pub fn product_types(&self) -> impl Iterator<Item = (&ProductDescriptor, &str)> {
        // every index was checked on construction
        self.products
            .iter()
            .filter_map(|p| Some((p, self.type_name_of(p)?)))
    }
}
