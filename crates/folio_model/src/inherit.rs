//! Walking the inheritance graph.
//!
//! Deep lookups merge members along the parent chain, used traits and (for
//! interfaces) extended interfaces. Later sources override earlier ones:
//!
//! | members    | precedence (low to high)                      |
//! |------------|-----------------------------------------------|
//! | methods    | extended interfaces, parent, traits, own      |
//! | properties | parent, traits, own                           |
//! | constants  | parent, own                                   |
//!
//! Names that the resolver cannot find (classes outside the project) are
//! skipped. A cyclic declaration such as `A extends B`, `B extends A` stops
//! at the first repeated class instead of recursing forever.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::convert::Infallible;
use std::rc::Rc;

use crate::class::ClassEntity;
use crate::member::{ConstantEntity, MethodEntity, PropertyEntity};

/// Looks up classes by fully qualified name.
pub trait ClassResolver {
    /// Failure to load a class that is known to exist.
    type Error;

    /// Returns `Ok(None)` when the name is not a project class.
    fn resolve(&self, name: &str) -> Result<Option<Rc<ClassEntity>>, Self::Error>;
}

impl ClassResolver for BTreeMap<String, Rc<ClassEntity>> {
    type Error = Infallible;

    fn resolve(&self, name: &str) -> Result<Option<Rc<ClassEntity>>, Infallible> {
        Ok(self.get(name).cloned())
    }
}

impl ClassResolver for HashMap<String, Rc<ClassEntity>> {
    type Error = Infallible;

    fn resolve(&self, name: &str) -> Result<Option<Rc<ClassEntity>>, Infallible> {
        Ok(self.get(name).cloned())
    }
}

/// A member together with the name of the class that declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<T> {
    /// Fully qualified name of the declaring class.
    pub class: String,
    /// The member itself.
    pub item: T,
}

/// Recursion guard: holds the classes on the current path only, so diamonds
/// are walked once per path while cycles terminate.
struct Path(HashSet<String>);

impl Path {
    fn new() -> Self {
        Self(HashSet::new())
    }

    fn enter(&mut self, name: &str) -> bool {
        self.0.insert(name.to_string())
    }

    fn leave(&mut self, name: &str) {
        self.0.remove(name);
    }
}

impl ClassEntity {
    /// Resolves the direct parent.
    pub fn parent_class<R: ClassResolver>(
        &self,
        resolver: &R,
    ) -> Result<Option<Rc<ClassEntity>>, R::Error> {
        match self.parent() {
            Some(name) => resolver.resolve(name),
            None => Ok(None),
        }
    }

    /// Names of all ancestors, nearest first. The chain ends at the first
    /// ancestor the resolver does not know, which is still included.
    pub fn parent_names<R: ClassResolver>(&self, resolver: &R) -> Result<Vec<String>, R::Error> {
        let mut names = Vec::new();
        let mut seen = HashSet::from([self.info.name.clone()]);
        let mut next = self.parent().map(str::to_string);
        while let Some(name) = next.take() {
            if !seen.insert(name.clone()) {
                break;
            }
            if let Some(class) = resolver.resolve(&name)? {
                next = class.parent().map(str::to_string);
            }
            names.push(name);
        }
        Ok(names)
    }

    /// Whether any ancestor is named `root`.
    pub fn is_exception<R: ClassResolver>(&self, resolver: &R, root: &str) -> Result<bool, R::Error> {
        Ok(self.parent_names(resolver)?.iter().any(|n| n == root))
    }

    /// Interface names, optionally including those inherited from parents
    /// and extended interfaces. Duplicates are removed, first occurrence wins.
    pub fn interface_names<R: ClassResolver>(
        &self,
        resolver: &R,
        deep: bool,
    ) -> Result<Vec<String>, R::Error> {
        if !deep {
            return Ok(self.interfaces().to_vec());
        }
        let mut out = Vec::new();
        self.collect_interfaces(resolver, &mut Path::new(), &mut out)?;
        Ok(out)
    }

    fn collect_interfaces<R: ClassResolver>(
        &self,
        resolver: &R,
        path: &mut Path,
        out: &mut Vec<String>,
    ) -> Result<(), R::Error> {
        if !path.enter(&self.info.name) {
            return Ok(());
        }
        for name in self.interfaces() {
            if !out.contains(name) {
                out.push(name.clone());
            }
            if let Some(interface) = resolver.resolve(name)? {
                interface.collect_interfaces(resolver, path, out)?;
            }
        }
        if let Some(parent) = self.parent_class(resolver)? {
            parent.collect_interfaces(resolver, path, out)?;
        }
        path.leave(&self.info.name);
        Ok(())
    }

    /// Trait names, optionally including traits used by parents and by the
    /// traits themselves.
    pub fn trait_names<R: ClassResolver>(
        &self,
        resolver: &R,
        deep: bool,
    ) -> Result<Vec<String>, R::Error> {
        if !deep {
            return Ok(self.traits().to_vec());
        }
        let mut out = Vec::new();
        self.collect_traits(resolver, &mut Path::new(), &mut out)?;
        Ok(out)
    }

    fn collect_traits<R: ClassResolver>(
        &self,
        resolver: &R,
        path: &mut Path,
        out: &mut Vec<String>,
    ) -> Result<(), R::Error> {
        if !path.enter(&self.info.name) {
            return Ok(());
        }
        for name in self.traits() {
            if !out.contains(name) {
                out.push(name.clone());
            }
            if let Some(used) = resolver.resolve(name)? {
                used.collect_traits(resolver, path, out)?;
            }
        }
        if let Some(parent) = self.parent_class(resolver)? {
            parent.collect_traits(resolver, path, out)?;
        }
        path.leave(&self.info.name);
        Ok(())
    }

    /// All methods visible on this class, keyed by name.
    pub fn methods_deep<R: ClassResolver>(
        &self,
        resolver: &R,
    ) -> Result<BTreeMap<String, Member<MethodEntity>>, R::Error> {
        let mut out = BTreeMap::new();
        self.collect_methods(resolver, &mut Path::new(), &mut out)?;
        Ok(out)
    }

    fn collect_methods<R: ClassResolver>(
        &self,
        resolver: &R,
        path: &mut Path,
        out: &mut BTreeMap<String, Member<MethodEntity>>,
    ) -> Result<(), R::Error> {
        if !path.enter(&self.info.name) {
            return Ok(());
        }
        if self.is_interface() {
            for name in self.interfaces() {
                if let Some(interface) = resolver.resolve(name)? {
                    interface.collect_methods(resolver, path, out)?;
                }
            }
        }
        if let Some(parent) = self.parent_class(resolver)? {
            parent.collect_methods(resolver, path, out)?;
        }
        for name in self.traits() {
            if let Some(used) = resolver.resolve(name)? {
                used.collect_methods(resolver, path, out)?;
            }
        }
        for (name, method) in self.methods() {
            out.insert(name.clone(), self.member(method));
        }
        path.leave(&self.info.name);
        Ok(())
    }

    /// All properties visible on this class, keyed by name.
    pub fn properties_deep<R: ClassResolver>(
        &self,
        resolver: &R,
    ) -> Result<BTreeMap<String, Member<PropertyEntity>>, R::Error> {
        let mut out = BTreeMap::new();
        self.collect_properties(resolver, &mut Path::new(), &mut out)?;
        Ok(out)
    }

    fn collect_properties<R: ClassResolver>(
        &self,
        resolver: &R,
        path: &mut Path,
        out: &mut BTreeMap<String, Member<PropertyEntity>>,
    ) -> Result<(), R::Error> {
        if !path.enter(&self.info.name) {
            return Ok(());
        }
        if let Some(parent) = self.parent_class(resolver)? {
            parent.collect_properties(resolver, path, out)?;
        }
        for name in self.traits() {
            if let Some(used) = resolver.resolve(name)? {
                used.collect_properties(resolver, path, out)?;
            }
        }
        for (name, property) in self.properties() {
            out.insert(name.clone(), self.member(property));
        }
        path.leave(&self.info.name);
        Ok(())
    }

    /// All constants visible on this class, keyed by name.
    pub fn constants_deep<R: ClassResolver>(
        &self,
        resolver: &R,
    ) -> Result<BTreeMap<String, Member<ConstantEntity>>, R::Error> {
        let mut path = Path::new();
        path.enter(&self.info.name);
        let mut ancestors = Vec::new();
        let mut current = self.parent_class(resolver)?;
        while let Some(class) = current {
            if !path.enter(&class.info.name) {
                break;
            }
            current = class.parent_class(resolver)?;
            ancestors.push(class);
        }
        let mut out = BTreeMap::new();
        for class in ancestors.iter().rev() {
            for (name, constant) in class.constants() {
                out.insert(name.clone(), class.member(constant));
            }
        }
        for (name, constant) in self.constants() {
            out.insert(name.clone(), self.member(constant));
        }
        Ok(out)
    }

    /// The nearest declaration of `name` above this class: first along the
    /// parent chain, then among the implemented interfaces.
    pub fn parent_method<R: ClassResolver>(
        &self,
        resolver: &R,
        name: &str,
    ) -> Result<Option<Member<MethodEntity>>, R::Error> {
        if let Some(parent) = self.parent_class(resolver)? {
            if let Some(found) = parent.methods_deep(resolver)?.remove(name) {
                return Ok(Some(found));
            }
        }
        for interface in self.interface_names(resolver, true)? {
            if let Some(class) = resolver.resolve(&interface)? {
                if let Some(method) = class.method(name) {
                    return Ok(Some(class.member(method)));
                }
            }
        }
        Ok(None)
    }

    fn member<T: Clone>(&self, item: &T) -> Member<T> {
        Member {
            class: self.info.name.clone(),
            item: item.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassCategory;
    use crate::entity::Documented;

    type Registry = BTreeMap<String, Rc<ClassEntity>>;

    fn register(registry: &mut Registry, class: ClassEntity) {
        registry.insert(class.info.name.clone(), Rc::new(class));
    }

    fn with_method(name: &str, method: &str, line: u32) -> ClassEntity {
        let mut class = ClassEntity::new(name, 1);
        class.add_method(MethodEntity::new(method, line));
        class
    }

    #[test]
    fn own_methods_override_traits_override_parent() {
        let mut registry = Registry::new();
        let mut base = with_method("Base", "run", 10);
        base.add_method(MethodEntity::new("stop", 11));
        register(&mut registry, base);
        let mut loud = with_method("Loud", "run", 20);
        loud.category = ClassCategory::Trait;
        loud.add_method(MethodEntity::new("shout", 21));
        register(&mut registry, loud);

        let mut child = with_method("Child", "shout", 30);
        child.set_parent(Some("Base"));
        child.add_trait("Loud");

        let methods = child.methods_deep(&registry).unwrap();
        assert_eq!(methods["stop"].class, "Base");
        assert_eq!(methods["run"].class, "Loud");
        assert_eq!(methods["shout"].class, "Child");
        assert_eq!(methods["shout"].item.line(), 30);
    }

    #[test]
    fn child_traits_win_over_parent_using_same_trait() {
        let mut registry = Registry::new();
        let mut helper = with_method("Helper", "help", 5);
        helper.category = ClassCategory::Trait;
        register(&mut registry, helper);
        let mut base = with_method("Base", "help", 6);
        base.add_trait("Helper");
        register(&mut registry, base);

        let mut child = ClassEntity::new("Child", 1);
        child.set_parent(Some("Base"));
        child.add_trait("Helper");

        let methods = child.methods_deep(&registry).unwrap();
        assert_eq!(methods["help"].class, "Helper");
    }

    #[test]
    fn interface_methods_only_merge_into_interfaces() {
        let mut registry = Registry::new();
        let mut countable = with_method("Countable", "count", 3);
        countable.category = ClassCategory::Interface;
        register(&mut registry, countable);

        let mut sized = ClassEntity::new("Sized", 1);
        sized.category = ClassCategory::Interface;
        sized.add_interface("Countable");
        assert!(sized.methods_deep(&registry).unwrap().contains_key("count"));

        let mut list = ClassEntity::new("List", 1);
        list.add_interface("Countable");
        assert!(list.methods_deep(&registry).unwrap().is_empty());
    }

    #[test]
    fn properties_and_constants_follow_the_parent_chain() {
        let mut registry = Registry::new();
        let mut base = ClassEntity::new("Base", 1);
        base.add_property(PropertyEntity::new("id", 2));
        base.add_constant(ConstantEntity::new("A", 3));
        base.add_constant(ConstantEntity::new("B", 4));
        register(&mut registry, base);

        let mut child = ClassEntity::new("Child", 1);
        child.set_parent(Some("Base"));
        child.add_property(PropertyEntity::new("name", 5));
        child.add_constant(ConstantEntity::new("B", 6));

        let properties = child.properties_deep(&registry).unwrap();
        assert_eq!(properties.keys().collect::<Vec<_>>(), ["id", "name"]);
        let constants = child.constants_deep(&registry).unwrap();
        assert_eq!(constants["A"].class, "Base");
        assert_eq!(constants["B"].class, "Child");
    }

    #[test]
    fn unknown_parents_end_the_chain() {
        let registry = Registry::new();
        let mut class = ClassEntity::new("App\\Error", 1);
        class.set_parent(Some("Exception"));
        assert_eq!(class.parent_names(&registry).unwrap(), ["Exception"]);
        assert!(class.is_exception(&registry, "Exception").unwrap());
        assert!(class.methods_deep(&registry).unwrap().is_empty());
    }

    #[test]
    fn exception_is_detected_through_project_parents() {
        let mut registry = Registry::new();
        let mut base = ClassEntity::new("App\\BaseError", 1);
        base.set_parent(Some("\\Exception"));
        register(&mut registry, base);
        let mut child = ClassEntity::new("App\\NotFound", 1);
        child.set_parent(Some("App\\BaseError"));

        assert!(child.is_exception(&registry, "Exception").unwrap());
        assert!(!child.is_exception(&registry, "Error").unwrap());
    }

    #[test]
    fn cyclic_inheritance_terminates() {
        let mut registry = Registry::new();
        let mut a = with_method("A", "a", 1);
        a.set_parent(Some("B"));
        a.add_interface("I");
        let mut b = with_method("B", "b", 2);
        b.set_parent(Some("A"));
        register(&mut registry, a.clone());
        register(&mut registry, b);

        assert_eq!(a.parent_names(&registry).unwrap(), ["B"]);
        let methods = a.methods_deep(&registry).unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(a.interface_names(&registry, true).unwrap(), ["I"]);
        assert_eq!(a.constants_deep(&registry).unwrap().len(), 0);
    }

    #[test]
    fn deep_interfaces_include_parents_and_extended() {
        let mut registry = Registry::new();
        let mut sized = ClassEntity::new("Sized", 1);
        sized.category = ClassCategory::Interface;
        sized.add_interface("Countable");
        register(&mut registry, sized);
        let mut base = ClassEntity::new("Base", 1);
        base.add_interface("Stringable");
        register(&mut registry, base);

        let mut child = ClassEntity::new("Child", 1);
        child.set_parent(Some("Base"));
        child.add_interface("Sized");

        assert_eq!(child.interface_names(&registry, false).unwrap(), ["Sized"]);
        assert_eq!(
            child.interface_names(&registry, true).unwrap(),
            ["Sized", "Countable", "Stringable"]
        );
    }

    #[test]
    fn parent_method_prefers_parents_then_interfaces() {
        let mut registry = Registry::new();
        let mut runnable = with_method("Runnable", "run", 2);
        runnable.category = ClassCategory::Interface;
        runnable.add_method(MethodEntity::new("stop", 3));
        register(&mut registry, runnable);
        register(&mut registry, with_method("Base", "run", 7));

        let mut child = with_method("Child", "run", 9);
        child.set_parent(Some("Base"));
        child.add_interface("Runnable");

        let run = child.parent_method(&registry, "run").unwrap().unwrap();
        assert_eq!(run.class, "Base");
        let stop = child.parent_method(&registry, "stop").unwrap().unwrap();
        assert_eq!(stop.class, "Runnable");
        assert!(child.parent_method(&registry, "missing").unwrap().is_none());
    }
}
