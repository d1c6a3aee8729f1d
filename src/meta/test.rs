use super::*;
use crate::catalog::{EnumMember, MethodDef, Param};

fn player() -> AgentType {
    let hp = PropertyDef {
        default_value: Some("100".to_owned()),
        description: "hit points".to_owned(),
        ..PropertyDef::member("", "hp", "int")
    };
    let gravity = PropertyDef {
        is_static: true,
        default_value: Some("9.8f".to_owned()),
        ..PropertyDef::member("", "gravity", "float")
    };
    let inherited = PropertyDef {
        is_inherited: true,
        ..PropertyDef::member("", "name", "behaviac::string")
    };
    let attack = MethodDef {
        description: "hits".to_owned(),
        ..MethodDef::new("", "attack", "behaviac::EBTStatus").with_param(Param::new("target", "int"))
    };
    AgentType {
        description: "the hero".to_owned(),
        ..AgentType::new("Player")
            .with_property(hp)
            .with_property(PropertyDef::member("", "speed", "float"))
            .with_property(gravity)
            .with_property(inherited)
            .with_method(attack)
            .with_method(MethodDef::new("", "jump", "void"))
    }
}

fn state() -> EnumType {
    EnumType {
        name: "EState".to_owned(),
        description: "states".to_owned(),
        members: vec![
            EnumMember {
                name: "Idle".to_owned(),
                value: 0,
                display_name: "Idle state".to_owned(),
            },
            EnumMember {
                name: "EState::Moving".to_owned(),
                value: 10,
                display_name: String::new(),
            },
        ],
        ..EnumType::default()
    }
}

fn vec2() -> StructType {
    StructType {
        name: "Vec2".to_owned(),
        properties: vec![
            PropertyDef::member("", "x", "float"),
            PropertyDef::member("", "y", "float"),
        ],
        ..StructType::default()
    }
}

#[test]
fn test_agent_skeleton() {
    let catalog = TypeCatalog {
        agents: vec![player()],
        ..TypeCatalog::default()
    };
    let config = ExportConfig::default();
    let file = agent_file(&catalog, &config, &catalog.agents[0]);
    assert_eq!(file.path, "behaviac_generated/types/Player.go");
    assert!(file.mergeable);
    assert_eq!(
        file.contents,
        r#"// ---------------------------------------------------------------------
// THIS FILE IS AUTO-GENERATED, SO PLEASE DON'T MODIFY IT BY YOURSELF!
// Export file: behaviac_generated/types/Player.go
// ---------------------------------------------------------------------

package behavior_types

import (
	"behaviac/bt"
)

// the hero
type Player struct {
	Hp    int     // hit points
	Speed float32
}

var PlayerGravity float32 = 9.8

func NewPlayer() *Player {
	_o := new(Player)
	_o.Hp = 100
	return _o
}

// hits
func (_o *Player) Attack(target int) bt.Status {
	// <<< BEGIN WRITING YOUR CODE Attack
	return bt.Invalid
	// <<< END WRITING YOUR CODE
}

func (_o *Player) Jump() {
	// <<< BEGIN WRITING YOUR CODE Jump
	// <<< END WRITING YOUR CODE
}

"#
    );
}

#[test]
fn test_skeleton_defaults() {
    let agent = AgentType::new("Bag")
        .with_property(PropertyDef {
            default_value: Some("3:1|2|3".to_owned()),
            ..PropertyDef::member("", "items", "vector<int>")
        })
        .with_property(PropertyDef::member("", "pos", "Vec2"))
        .with_method(
            MethodDef::new("", "fill", "Vec2").with_param(Param::new("count", "int").by_ref()),
        );
    let catalog = TypeCatalog {
        agents: vec![agent],
        structs: vec![vec2()],
        ..TypeCatalog::default()
    };
    let config = ExportConfig::default();
    let text = agent_file(&catalog, &config, &catalog.agents[0]).contents;
    assert!(!text.contains("import"));
    assert!(text.contains("\tItems []int\n\tPos   Vec2\n"));
    assert!(text.contains("\t_o.Items = []int{1, 2, 3}\n\treturn _o\n"));
    assert!(text.contains("func (_o *Bag) Fill(count *int) Vec2 {\n"));
    assert!(text.contains("\treturn Vec2{}\n"));
}

#[test]
fn test_skipped_agents() {
    let mut implemented = AgentType::new("Boss");
    implemented.is_implemented = true;
    let catalog = TypeCatalog {
        agents: vec![
            AgentType::new(AGENT_BASE),
            implemented,
            player(),
            AgentType::new("game::Npc"),
        ],
        ..TypeCatalog::default()
    };
    let files = generate(&catalog, &ExportConfig::default());
    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "behaviac_generated/types/Player.go",
            "behaviac_generated/types/game/Npc.go"
        ]
    );
    assert!(files[1].contents.contains("\npackage game\n"));
}

#[test]
fn test_customized_types() {
    let vec3 = StructType {
        name: "Vec3".to_owned(),
        base: Some("Vec2".to_owned()),
        properties: vec![PropertyDef::member("", "z", "float")],
        ..StructType::default()
    };
    let mut implemented = vec2();
    implemented.name = "Rect".to_owned();
    implemented.is_implemented = true;
    let catalog = TypeCatalog {
        enums: vec![state()],
        structs: vec![vec2(), vec3, implemented],
        ..TypeCatalog::default()
    };
    let config = ExportConfig::default();
    let file = customized_types_file(&catalog, &config).unwrap();
    assert_eq!(file.path, "behaviac_generated/types/customized_types.go");
    assert!(!file.mergeable);

    let text = &file.contents;
    assert!(text.contains(
        r#"package behavior_types

// -------------------
// Customized enums
// -------------------

// states
type EState int

const (
	Idle   EState = 0  // Idle state
	Moving EState = 10
)

// -------------------
// Customized structs
// -------------------

type Vec2 struct {
	X float32
	Y float32
}

type Vec3 struct {
	Vec2
	Z float32
}
"#
    ));
    assert!(!text.contains("Rect"));
}

#[test]
fn test_no_customized_types() {
    let catalog = TypeCatalog {
        agents: vec![player()],
        ..TypeCatalog::default()
    };
    assert_eq!(customized_types_file(&catalog, &ExportConfig::default()), None);
}

#[test]
fn test_located_types() {
    let mut color = state();
    color.name = "Color".to_owned();
    color.export_location = Some("game/enums/".to_owned());
    let catalog = TypeCatalog {
        enums: vec![color],
        ..TypeCatalog::default()
    };
    let files = generate(&catalog, &ExportConfig::default());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "behaviac_generated/types/game/enums/Color.go");
    assert!(files[0].contents.contains("\npackage enums\n"));
    assert!(files[0].contents.contains("\tIdle   Color = 0  // Idle state\n"));
}

#[test]
fn test_located_agent() {
    let npc = AgentType {
        export_location: Some("/npcs/".to_owned()),
        ..AgentType::new("game::Npc")
    };
    let catalog = TypeCatalog {
        agents: vec![npc],
        ..TypeCatalog::default()
    };
    let files = generate(&catalog, &ExportConfig::default());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "behaviac_generated/types/npcs/Npc.go");
    assert!(files[0].contents.contains("\npackage npcs\n"));
    assert!(files[0].contents.contains("type Npc struct {\n"));
}
