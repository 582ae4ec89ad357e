//! Earth Engine 運算式圖 (expression graph) 的序列化模型。
//!
//! 每個節點以數字鍵存放在 `values` 表中，函式呼叫透過 `valueReference`
//! 互相引用，`result` 指向最終節點。

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueNode {
    ConstantValue(serde_json::Value),
    FunctionInvocationValue(FunctionInvocation),
    FunctionDefinitionValue(FunctionDefinition),
    ArgumentReference(String),
    ValueReference(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInvocation {
    pub function_name: String,
    pub arguments: BTreeMap<String, ValueNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    pub argument_names: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub result: String,
    pub values: BTreeMap<String, ValueNode>,
}

impl Expression {
    pub fn node(&self, key: &str) -> Option<&ValueNode> {
        self.values.get(key)
    }

    /// 依函式名稱找出所有呼叫節點
    pub fn invocations_of<'a>(
        &'a self,
        function_name: &'a str,
    ) -> impl Iterator<Item = &'a FunctionInvocation> + 'a {
        self.values.values().filter_map(move |node| match node {
            ValueNode::FunctionInvocationValue(call) if call.function_name == function_name => {
                Some(call)
            }
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    values: BTreeMap<String, ValueNode>,
    next_key: usize,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: impl Into<serde_json::Value>) -> ValueNode {
        ValueNode::ConstantValue(value.into())
    }

    pub fn argument(name: &str) -> ValueNode {
        ValueNode::ArgumentReference(name.to_string())
    }

    fn intern(&mut self, node: ValueNode) -> String {
        if let ValueNode::ValueReference(key) = &node {
            return key.clone();
        }
        let key = self.next_key.to_string();
        self.next_key += 1;
        self.values.insert(key.clone(), node);
        key
    }

    /// 新增函式呼叫節點並回傳其引用
    pub fn invoke<'a>(
        &mut self,
        function_name: &str,
        arguments: impl IntoIterator<Item = (&'a str, ValueNode)>,
    ) -> ValueNode {
        let call = FunctionInvocation {
            function_name: function_name.to_string(),
            arguments: arguments
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        };
        let key = self.intern(ValueNode::FunctionInvocationValue(call));
        ValueNode::ValueReference(key)
    }

    /// 定義一個單參數以上的函式 (用於 `Collection.map`)
    pub fn function(&mut self, argument_names: &[&str], body: ValueNode) -> ValueNode {
        let body = self.intern(body);
        ValueNode::FunctionDefinitionValue(FunctionDefinition {
            argument_names: argument_names.iter().map(|s| s.to_string()).collect(),
            body,
        })
    }

    pub fn build(mut self, result: ValueNode) -> Expression {
        let result = self.intern(result);
        Expression {
            result,
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invocation_serializes_as_reference_graph() {
        let mut builder = ExpressionBuilder::new();
        let load = builder.invoke(
            "ImageCollection.load",
            [("id", ExpressionBuilder::constant("COPERNICUS/S2_SR"))],
        );
        let size = builder.invoke("Collection.size", [("collection", load)]);
        let expression = builder.build(size);

        let json = serde_json::to_value(&expression).unwrap();
        assert_eq!(
            json,
            json!({
                "result": "1",
                "values": {
                    "0": {"functionInvocationValue": {
                        "functionName": "ImageCollection.load",
                        "arguments": {"id": {"constantValue": "COPERNICUS/S2_SR"}}
                    }},
                    "1": {"functionInvocationValue": {
                        "functionName": "Collection.size",
                        "arguments": {"collection": {"valueReference": "0"}}
                    }}
                }
            })
        );
    }

    #[test]
    fn test_function_definition_points_at_interned_body() {
        let mut builder = ExpressionBuilder::new();
        let body = builder.invoke(
            "Image.select",
            [
                ("input", ExpressionBuilder::argument("_MAPPING_VAR_0_0")),
                ("bandSelectors", ExpressionBuilder::constant(json!(["NDVI"]))),
            ],
        );
        let func = builder.function(&["_MAPPING_VAR_0_0"], body);

        let json = serde_json::to_value(&func).unwrap();
        assert_eq!(
            json,
            json!({"functionDefinitionValue": {"argumentNames": ["_MAPPING_VAR_0_0"], "body": "0"}})
        );
    }

    #[test]
    fn test_constant_result_is_interned() {
        let builder = ExpressionBuilder::new();
        let expression = builder.build(ExpressionBuilder::constant(42));
        assert_eq!(expression.result, "0");
        assert_eq!(
            expression.node("0"),
            Some(&ValueNode::ConstantValue(json!(42)))
        );
    }
}
