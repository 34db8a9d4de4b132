use std::collections::HashMap;

use crate::{
    messages::{
        command::{ArgValue, MessageTarget},
        error::CommandError,
    },
    world::component::field_value::{FieldType, FieldValue},
    Entity,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    pub field_type: FieldType,
}

impl ParamDescriptor {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
        }
    }

    /// Text, bytes and entity parameters accept null
    pub fn is_nullable(&self) -> bool {
        matches!(
            self.field_type,
            FieldType::Text | FieldType::Bytes | FieldType::Entity
        )
    }
}

/// A method as declared on a type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    pub is_public: bool,
    pub is_static: bool,
    /// Routing the method was registered with, `None` if it never was
    pub routing: Option<MessageTarget>,
}

impl MethodDescriptor {
    /// Public instance method registered with `routing`
    pub fn command(name: &str, routing: MessageTarget) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            is_public: true,
            is_static: false,
            routing: Some(routing),
        }
    }

    /// Method without routing registration
    pub fn plain(name: &str) -> Self {
        Self {
            routing: None,
            ..Self::command(name, MessageTarget::All)
        }
    }

    pub fn param(mut self, name: &str, field_type: FieldType) -> Self {
        self.params.push(ParamDescriptor::new(name, field_type));
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// A networked type and its methods
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub parent: Option<String>,
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    fn is_overloaded(&self, method: &str) -> bool {
        self.methods
            .iter()
            .filter(|candidate| candidate.name == method)
            .count()
            > 1
    }
}

/// A command as it travels: its network name, parameters and routing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSignature {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    pub routing: MessageTarget,
}

impl CommandSignature {
    /// Checks arity, assignability and nullability of `args`. Entity
    /// arguments are checked with `is_valid_entity` when given.
    pub fn validate(
        &self,
        args: &[ArgValue],
        is_valid_entity: Option<&dyn Fn(Entity) -> bool>,
    ) -> Result<(), CommandError> {
        if args.len() != self.params.len() {
            return Err(CommandError::ArgumentCount {
                command: self.name.clone(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }

        for (index, (arg, param)) in args.iter().zip(self.params.iter()).enumerate() {
            match arg {
                ArgValue::Null => {
                    if !param.is_nullable() {
                        return Err(CommandError::NullArgument {
                            command: self.name.clone(),
                            index,
                            name: param.name.clone(),
                            expected: param.field_type.name(),
                        });
                    }
                }
                ArgValue::Value(value) => {
                    if value.field_type() != param.field_type {
                        return Err(CommandError::ArgumentType {
                            command: self.name.clone(),
                            index,
                            name: param.name.clone(),
                            expected: param.field_type.name(),
                            actual: value.field_type().name(),
                        });
                    }
                    if let (FieldValue::Entity(Some(entity)), Some(is_valid)) =
                        (value, is_valid_entity)
                    {
                        if !is_valid(*entity) {
                            return Err(CommandError::InvalidEntityArgument {
                                command: self.name.clone(),
                                index,
                                name: param.name.clone(),
                                entity: entity.to_string(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Replaces nulls with the empty value of their parameter type.
    /// Expects arguments that passed [`validate`](Self::validate).
    pub fn normalize(&self, args: &[ArgValue]) -> Vec<FieldValue> {
        args.iter()
            .zip(self.params.iter())
            .map(|(arg, param)| match arg {
                ArgValue::Null => param.field_type.default_value(),
                ArgValue::Value(value) => value.clone(),
            })
            .collect()
    }

    fn accepts(&self, args: &[ArgValue]) -> bool {
        self.validate(args, None).is_ok()
    }
}

/// Every networked type known to the protocol, and the commands they declare
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    types: HashMap<String, TypeDescriptor>,
    commands: HashMap<String, CommandSignature>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        for method in &descriptor.methods {
            let Some(routing) = method.routing else {
                continue;
            };
            if !method.is_public || method.is_static {
                continue;
            }
            let name = command_name(&descriptor, method);
            self.commands.insert(
                name.clone(),
                CommandSignature {
                    name,
                    params: method.params.clone(),
                    routing,
                },
            );
        }
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Signature of a registered command, by network name
    pub fn signature(&self, command: &str) -> Option<&CommandSignature> {
        self.commands.get(command)
    }

    pub fn try_signature(&self, command: &str) -> Result<&CommandSignature, CommandError> {
        self.signature(command)
            .ok_or_else(|| CommandError::UnknownCommand {
                command: command.to_string(),
            })
    }

    /// Finds the command `method` of `type_name` (or of its closest ancestor
    /// declaring it) that accepts `args`
    pub fn resolve(
        &self,
        type_name: &str,
        method: &str,
        args: &[ArgValue],
    ) -> Result<&CommandSignature, CommandError> {
        let mut current = Some(type_name);
        let mut visited = 0;

        while let Some(name) = current {
            let descriptor = self.types.get(name).ok_or_else(|| CommandError::UnknownType {
                type_name: name.to_string(),
            })?;

            let candidates: Vec<&MethodDescriptor> = descriptor
                .methods
                .iter()
                .filter(|candidate| candidate.name == method)
                .collect();

            if !candidates.is_empty() {
                return self.select(descriptor, &candidates, args);
            }

            visited += 1;
            if visited > self.types.len() {
                // cyclic parent chain
                break;
            }
            current = descriptor.parent.as_deref();
        }

        Err(CommandError::DoesNotExist {
            type_name: type_name.to_string(),
            method: method.to_string(),
        })
    }

    fn select(
        &self,
        descriptor: &TypeDescriptor,
        candidates: &[&MethodDescriptor],
        args: &[ArgValue],
    ) -> Result<&CommandSignature, CommandError> {
        let mut first_error = None;

        for method in candidates {
            let name = command_name(descriptor, method);
            if method.is_static {
                first_error.get_or_insert(CommandError::IsStatic { command: name });
                continue;
            }
            if !method.is_public {
                first_error.get_or_insert(CommandError::NotPublic { command: name });
                continue;
            }
            let Some(signature) = self.commands.get(&name) else {
                first_error.get_or_insert(CommandError::NotBaked { command: name });
                continue;
            };
            if signature.accepts(args) {
                return Ok(signature);
            }
            if candidates.len() == 1 || signature.params.len() == args.len() {
                if let Err(err) = signature.validate(args, None) {
                    first_error.get_or_insert(err);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| CommandError::ArgumentCount {
            command: format!("{}.{}", descriptor.name, candidates[0].name),
            expected: candidates[0].params.len(),
            actual: args.len(),
        }))
    }
}

/// `Type.method`, with the parameter types appended when the type declares
/// several methods of that name
pub fn command_name(descriptor: &TypeDescriptor, method: &MethodDescriptor) -> String {
    if descriptor.is_overloaded(&method.name) {
        let params: Vec<&str> = method
            .params
            .iter()
            .map(|param| param.field_type.name())
            .collect();
        format!("{}.{}({})", descriptor.name, method.name, params.join(","))
    } else {
        format!("{}.{}", descriptor.name, method.name)
    }
}
